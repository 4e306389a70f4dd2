//! One attachment's journey: download, upload, classify, register.

use std::time::Duration;

use intake_core::{Attachment, TransferredDocument, classify_filename};
use intake_store::{DocumentRecord, DocumentStore};
use tracing::{info, warn};

/// Per-attachment download timeout.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Move one attachment into the object store and registry.
///
/// Every step failure is logged and collapses to `None`; sibling
/// attachments are unaffected and nothing is retried. A registration
/// failure still leaves the object in storage — accepted: the keyed
/// upsert on the next webhook for the same card heals the registry.
pub async fn transfer_document(
    http: &reqwest::Client,
    store: &dyn DocumentStore,
    case_id: &str,
    pipe_id: Option<&str>,
    attachment: &Attachment,
) -> Option<TransferredDocument> {
    let bytes = match download(http, &attachment.source_url).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(name = %attachment.name, error = %err, "attachment download failed");
            return None;
        }
    };

    let path = format!("{case_id}/{}", attachment.name);
    let file_url = match store.upload(&path, bytes).await {
        Ok(url) => url,
        Err(err) => {
            warn!(name = %attachment.name, error = %err, "attachment upload failed");
            return None;
        }
    };

    let tag = classify_filename(&attachment.name);
    let record = DocumentRecord::uploaded(case_id, &attachment.name, tag, &file_url, pipe_id);
    if let Err(err) = store.register_document(&record).await {
        warn!(
            name = %attachment.name,
            error = %err,
            "registration failed, dropping document from the analysis set"
        );
        return None;
    }

    info!(name = %attachment.name, tag = %tag.as_str(), "document transferred");
    Some(TransferredDocument {
        name: attachment.name.clone(),
        file_url,
        tag,
    })
}

async fn download(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let resp = http
        .get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
