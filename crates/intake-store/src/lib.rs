//! Storage layer: object uploads, the document registry, and checklist
//! configuration, behind one collaborator trait.

mod error;
mod http;
mod memory;
mod store;

pub use error::StoreError;
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use store::{DocumentRecord, DocumentStore};
