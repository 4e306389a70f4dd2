//! In-memory [`DocumentStore`] for tests and local runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::{DocumentRecord, DocumentStore};

/// Keeps uploads and registry rows in maps; registration is a keyed
/// upsert with the same `(case_id, name)` semantics as the HTTP
/// implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<String, Vec<u8>>,
    documents: HashMap<(String, String), DocumentRecord>,
    checklists: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a checklist configuration row.
    pub fn insert_checklist(&self, config_name: &str, url: &str) {
        let mut inner = self.lock();
        inner
            .checklists
            .insert(config_name.to_string(), url.to_string());
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    pub fn document(&self, case_id: &str, name: &str) -> Option<DocumentRecord> {
        self.lock()
            .documents
            .get(&(case_id.to_string(), name.to_string()))
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let mut inner = self.lock();
        inner.objects.insert(path.to_string(), bytes);
        Ok(format!("memory://{path}"))
    }

    async fn register_document(&self, record: &DocumentRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.documents.insert(
            (record.case_id.clone(), record.name.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn checklist_url(&self, config_name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().checklists.get(config_name).cloned())
    }
}
