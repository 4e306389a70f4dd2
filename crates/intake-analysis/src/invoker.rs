//! Analysis invocation: probe, invoke, single cold-start retry, and
//! report write-back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use intake_core::AnalysisRequest;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::transport::{AnalysisTransport, TransportError};

/// Pause before the single cold-start retry.
const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Where a completed analysis summary is written.
#[async_trait]
pub trait SummarySink: Send + Sync {
    /// Write the summary for a case; returns whether the write succeeded.
    async fn publish_summary(&self, case_id: &str, summary: &str) -> bool;
}

/// Final result of one analysis invocation. Observable only through logs
/// and the card-field side effect; the webhook caller never sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Completed on the first attempt.
    Success {
        risk_score: Option<f64>,
        summary_report: String,
        card_updated: bool,
    },
    /// Completed on the retry after a cold start.
    RetriedSuccess {
        risk_score: Option<f64>,
        summary_report: String,
        card_updated: bool,
    },
    /// The service answered 200 without a completed result.
    PartialSuccess { raw: String },
    /// The service failed, or the single retry did.
    Failed { message: String },
    /// The transport timed out.
    TimedOut,
}

#[derive(Deserialize)]
struct AnalysisReply {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    analysis_result: Option<AnalysisResult>,
}

#[derive(Deserialize)]
struct AnalysisResult {
    #[serde(default)]
    risk_score: Option<f64>,
    #[serde(default)]
    summary_report: Option<String>,
}

/// The completed payload parsed out of a 200 reply, when present.
fn completed_result(body: &str) -> Option<AnalysisResult> {
    let reply: AnalysisReply = serde_json::from_str(body).ok()?;
    if reply.status.as_deref() == Some("completed") {
        reply.analysis_result
    } else {
        None
    }
}

/// Drives one analysis round trip against a possibly sleeping service.
///
/// A 502 is read as a cold start: the invoker sleeps and re-invokes
/// exactly once, bounding the worst case to two invocation timeouts plus
/// the pause. On a completed result with a non-empty summary the sink is
/// called exactly once.
pub struct Invoker {
    transport: Arc<dyn AnalysisTransport>,
    sink: Arc<dyn SummarySink>,
    retry_delay: Duration,
}

impl Invoker {
    pub fn new(transport: Arc<dyn AnalysisTransport>, sink: Arc<dyn SummarySink>) -> Self {
        Self {
            transport,
            sink,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the cold-start pause (tests run with zero delay).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Run the full invocation protocol for one request.
    pub async fn run(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        // The probe is informational: a sleeping service often fails it
        // and still wakes up for the invocation below.
        match self.transport.health().await {
            Ok(200) => info!(case_id = %request.case_id, "analysis service is up"),
            Ok(status) => {
                warn!(case_id = %request.case_id, status, "analysis service probe degraded")
            }
            Err(err) => {
                warn!(case_id = %request.case_id, error = %err, "analysis service probe failed")
            }
        }

        info!(
            case_id = %request.case_id,
            documents = request.documents.len(),
            "invoking analysis service"
        );
        let first = match self.transport.analyze(request).await {
            Ok(reply) => reply,
            Err(TransportError::Timeout) => {
                error!(case_id = %request.case_id, "analysis invocation timed out");
                return AnalysisOutcome::TimedOut;
            }
            Err(err) => {
                return AnalysisOutcome::Failed {
                    message: err.to_string(),
                };
            }
        };

        match first.status {
            200 => self.complete(request, &first.body, false).await,
            502 => {
                warn!(
                    case_id = %request.case_id,
                    delay_secs = self.retry_delay.as_secs(),
                    "analysis service cold start (502), retrying once"
                );
                tokio::time::sleep(self.retry_delay).await;

                let second = match self.transport.analyze(request).await {
                    Ok(reply) => reply,
                    Err(TransportError::Timeout) => return AnalysisOutcome::TimedOut,
                    Err(err) => {
                        return AnalysisOutcome::Failed {
                            message: err.to_string(),
                        };
                    }
                };
                if second.status == 200 {
                    self.complete(request, &second.body, true).await
                } else {
                    AnalysisOutcome::Failed {
                        message: format!(
                            "analysis service returned {} after retry: {}",
                            second.status, second.body
                        ),
                    }
                }
            }
            status => AnalysisOutcome::Failed {
                message: format!("analysis service returned {status}: {}", first.body),
            },
        }
    }

    /// Handle a 200 body: extract the completed result and push the
    /// summary to the card, or degrade.
    async fn complete(
        &self,
        request: &AnalysisRequest,
        body: &str,
        retried: bool,
    ) -> AnalysisOutcome {
        let Some(result) = completed_result(body) else {
            if retried {
                return AnalysisOutcome::Failed {
                    message: "analysis reply incomplete after retry".to_string(),
                };
            }
            warn!(case_id = %request.case_id, "analysis reply has no completed result");
            return AnalysisOutcome::PartialSuccess {
                raw: body.to_string(),
            };
        };

        let summary_report = result.summary_report.unwrap_or_default();
        let mut card_updated = false;
        if summary_report.is_empty() {
            warn!(case_id = %request.case_id, "completed analysis carried no summary report");
        } else {
            card_updated = self
                .sink
                .publish_summary(&request.case_id, &summary_report)
                .await;
            if !card_updated {
                warn!(case_id = %request.case_id, "summary publish failed");
            }
        }

        if retried {
            AnalysisOutcome::RetriedSuccess {
                risk_score: result.risk_score,
                summary_report,
                card_updated,
            }
        } else {
            AnalysisOutcome::Success {
                risk_score: result.risk_score,
                summary_report,
                card_updated,
            }
        }
    }
}
