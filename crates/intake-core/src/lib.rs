//! Shared domain types for the intake pipeline: card fields, attachments,
//! document tags, and the analysis request.

pub mod card;
pub mod document;
pub mod request;

pub use card::{CardField, FieldReference};
pub use document::{Attachment, DocumentTag, TransferredDocument, classify_filename};
pub use request::AnalysisRequest;
