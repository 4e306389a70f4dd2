//! HTTP surface: strict webhook decode, the ingestion pipeline, and the
//! background worker that carries analysis past the webhook response.

mod error;
mod payload;
mod service;
mod state;
mod transfer;
mod webhook;
pub mod worker;

pub use error::ApiError;
pub use payload::{ReportNotification, WebhookPayload};
pub use state::{AppState, CardSummarySink, ServerConfig};
pub use transfer::transfer_document;
pub use webhook::{card_webhook, report_webhook};
pub use worker::{Job, JobQueue};

use axum::Router;
use axum::routing::{get, post};

/// Build the service router over a fully constructed [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service::info))
        .route("/health", get(service::health))
        .route("/webhook/pipefy", post(webhook::card_webhook))
        .route("/webhook/report", post(webhook::report_webhook))
        .with_state(state)
}
