//! The object-store/registry collaborator boundary.

use async_trait::async_trait;
use intake_core::DocumentTag;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Registry row for an ingested document, upserted on `(case_id, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub case_id: String,
    pub name: String,
    #[serde(rename = "document_tag")]
    pub tag: DocumentTag,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipe_id: Option<String>,
    pub status: String,
}

impl DocumentRecord {
    /// A freshly uploaded document.
    pub fn uploaded(
        case_id: &str,
        name: &str,
        tag: DocumentTag,
        file_url: &str,
        pipe_id: Option<&str>,
    ) -> Self {
        Self {
            case_id: case_id.to_string(),
            name: name.to_string(),
            tag,
            file_url: file_url.to_string(),
            pipe_id: pipe_id.map(str::to_string),
            status: "uploaded".to_string(),
        }
    }
}

/// Object storage plus document registry, as one collaborator.
///
/// Both writes are idempotent: uploads overwrite the object at `path`,
/// and registration is a keyed upsert, so re-processing the same card and
/// filename never duplicates.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `bytes` at `path`, overwriting any previous object, and
    /// return a durable public URL for it.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, StoreError>;

    /// Upsert a registry row keyed on `(case_id, name)`.
    async fn register_document(&self, record: &DocumentRecord) -> Result<(), StoreError>;

    /// Look up the checklist URL for a named checklist configuration.
    async fn checklist_url(&self, config_name: &str) -> Result<Option<String>, StoreError>;
}
