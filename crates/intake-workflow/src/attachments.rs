//! Extracts attachment references from a card's field values.

use intake_core::{Attachment, CardField};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::CardGateway;

/// Resolve every attachment referenced by a card's field values.
///
/// A field value is either a JSON-encoded array of URLs (the workflow
/// tool's attachment encoding) or occasionally a bare URL string;
/// anything else is ignored. Elements that are not HTTP(S) URLs are
/// skipped.
pub fn resolve_attachments(fields: &[CardField]) -> Vec<Attachment> {
    let mut attachments = Vec::new();
    for field in fields {
        let Some(value) = field.value.as_deref() else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(value) {
            Ok(Value::Array(items)) => {
                for item in items {
                    if let Value::String(url) = item
                        && looks_like_url(&url)
                    {
                        attachments.push(Attachment {
                            name: filename_from_url(&url, &field.name),
                            source_url: url,
                        });
                    }
                }
            }
            // Valid JSON that is not a URL array carries no attachments.
            Ok(_) => {}
            Err(_) => {
                if looks_like_url(value) {
                    attachments.push(Attachment {
                        name: filename_from_url(value, &field.name),
                        source_url: value.to_string(),
                    });
                }
            }
        }
    }
    attachments
}

/// Fetch a card's fields and resolve attachments, absorbing every gateway
/// error into an empty list. A card with no attachments is a normal case,
/// not a failure.
pub async fn card_attachments(gateway: &dyn CardGateway, card_id: &str) -> Vec<Attachment> {
    match gateway.card_fields(card_id).await {
        Ok(fields) => {
            let attachments = resolve_attachments(&fields);
            info!(card_id = %card_id, count = attachments.len(), "attachments resolved");
            attachments
        }
        Err(err) => {
            warn!(card_id = %card_id, error = %err, "card field fetch failed, treating as no attachments");
            Vec::new()
        }
    }
}

fn looks_like_url(value: &str) -> bool {
    value.starts_with("http")
}

/// Filename for an attachment URL: the last path segment with the query
/// string stripped, falling back to `"{field name}.pdf"` when empty.
fn filename_from_url(url: &str, field_name: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    let segment = without_query.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        format!("{field_name}.pdf")
    } else {
        segment.to_string()
    }
}
