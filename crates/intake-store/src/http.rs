//! HTTP implementation of [`DocumentStore`] against a Supabase-style
//! storage + REST API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::error::StoreError;
use crate::store::{DocumentRecord, DocumentStore};

/// Registry table holding one row per ingested document.
const DOCUMENTS_TABLE: &str = "documents";
/// Registry table mapping checklist configuration names to URLs.
const CHECKLIST_TABLE: &str = "checklist_config";

/// Service-key-authenticated client for the object store and registry.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl HttpStore {
    /// Create a client for the given store base URL (no trailing slash)
    /// and bucket.
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    /// Public URL of the object at `path` in this store's bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// Fallback checklist document, served from the store's public
    /// `checklist` bucket.
    pub fn default_checklist_url(&self) -> String {
        format!(
            "{}/storage/v1/object/public/checklist/checklist.pdf",
            self.base_url
        )
    }

    async fn check(
        resp: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
        let size = bytes.len();
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        Self::check(resp, "upload").await?;

        info!(path = %path, size, "object uploaded");
        Ok(self.public_url(path))
    }

    async fn register_document(&self, record: &DocumentRecord) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, DOCUMENTS_TABLE);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Prefer", "resolution=merge-duplicates")
            .query(&[("on_conflict", "case_id,name")])
            .json(record)
            .send()
            .await?;
        Self::check(resp, "register").await?;

        info!(case_id = %record.case_id, name = %record.name, "document registered");
        Ok(())
    }

    async fn checklist_url(&self, config_name: &str) -> Result<Option<String>, StoreError> {
        #[derive(Deserialize)]
        struct Row {
            checklist_url: Option<String>,
        }

        let url = format!("{}/rest/v1/{}", self.base_url, CHECKLIST_TABLE);
        let filter = format!("eq.{config_name}");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .query(&[("select", "checklist_url"), ("config_name", filter.as_str())])
            .send()
            .await?;
        let resp = Self::check(resp, "checklist").await?;

        let rows: Vec<Row> = resp.json().await?;
        Ok(rows.into_iter().next().and_then(|row| row.checklist_url))
    }
}
