//! Workflow-tool boundary: GraphQL card access, attachment resolution,
//! report-field location and update.

mod attachments;
mod client;
mod error;
mod fields;
mod report;

pub use attachments::{card_attachments, resolve_attachments};
pub use client::{CardGateway, WorkflowClient};
pub use error::WorkflowError;
pub use fields::{FieldTarget, locate_field};
pub use report::publish_report;
