//! Shared handles for the HTTP surface.

use std::sync::Arc;

use async_trait::async_trait;
use intake_analysis::{AnalysisTransport, SummarySink};
use intake_store::DocumentStore;
use intake_workflow::{CardGateway, FieldTarget, publish_report};
use tracing::warn;

use crate::worker::JobQueue;

/// Everything a request handler needs: constructed once at startup,
/// cloned per request. No ambient globals — every collaborator is an
/// injected handle.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CardGateway>,
    pub store: Arc<dyn DocumentStore>,
    pub analysis: Arc<dyn AnalysisTransport>,
    /// Client for fetching attachment bytes from their source URLs.
    pub downloads: reqwest::Client,
    pub jobs: JobQueue,
    pub config: Arc<ServerConfig>,
}

/// Request-independent settings.
pub struct ServerConfig {
    /// Checklist configuration row consulted before each analysis.
    pub checklist_config: String,
    /// Fallback when the checklist lookup fails or finds nothing.
    pub fallback_checklist_url: String,
    /// Analysis service base URL, reported by the info endpoints.
    pub analysis_base_url: String,
}

/// Writes analysis summaries into the card's report field through the
/// workflow gateway.
pub struct CardSummarySink {
    gateway: Arc<dyn CardGateway>,
    target: FieldTarget,
}

impl CardSummarySink {
    pub fn new(gateway: Arc<dyn CardGateway>, target: FieldTarget) -> Self {
        Self { gateway, target }
    }
}

#[async_trait]
impl SummarySink for CardSummarySink {
    async fn publish_summary(&self, case_id: &str, summary: &str) -> bool {
        match publish_report(self.gateway.as_ref(), &self.target, case_id, summary).await {
            Ok(()) => true,
            Err(err) => {
                warn!(case_id = %case_id, error = %err, "summary publish failed");
                false
            }
        }
    }
}
