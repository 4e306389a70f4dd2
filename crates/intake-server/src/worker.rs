//! Bounded background queue for work that outlives the webhook response.
//!
//! Fire-and-forget by design: the webhook caller never sees an outcome,
//! only the logs and the card-field side effect do. Jobs run to
//! completion or timeout; there is no cancellation.

use std::sync::Arc;

use intake_analysis::{AnalysisOutcome, Invoker, SummarySink};
use intake_core::AnalysisRequest;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Work items the webhook handlers hand off.
#[derive(Debug)]
pub enum Job {
    /// Run the full analysis protocol for a case.
    Analyze(AnalysisRequest),
    /// Push an externally produced report into the card field.
    Publish { case_id: String, report: String },
}

/// Sending half of the queue, cloned into request state.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
}

impl JobQueue {
    /// Enqueue without waiting. A full queue drops the job with a log
    /// line — never an error to the webhook caller.
    pub fn enqueue(&self, job: Job) {
        if let Err(err) = self.tx.try_send(job) {
            warn!(error = %err, "background queue rejected job");
        }
    }
}

/// Create the bounded queue; the receiving half goes to [`spawn`].
pub fn queue(capacity: usize) -> (JobQueue, mpsc::Receiver<Job>) {
    let (tx, rx) = mpsc::channel(capacity);
    (JobQueue { tx }, rx)
}

/// Spawn the single worker task draining the queue.
pub fn spawn(
    mut rx: mpsc::Receiver<Job>,
    invoker: Invoker,
    sink: Arc<dyn SummarySink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match job {
                Job::Analyze(request) => {
                    let case_id = request.case_id.clone();
                    let outcome = invoker.run(&request).await;
                    log_outcome(&case_id, &outcome);
                }
                Job::Publish { case_id, report } => {
                    if sink.publish_summary(&case_id, &report).await {
                        info!(case_id = %case_id, "report pushed to card");
                    } else {
                        error!(case_id = %case_id, "report push failed");
                    }
                }
            }
        }
    })
}

fn log_outcome(case_id: &str, outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Success { card_updated, .. } => {
            info!(case_id = %case_id, card_updated, "analysis completed");
        }
        AnalysisOutcome::RetriedSuccess { card_updated, .. } => {
            info!(case_id = %case_id, card_updated, "analysis completed after cold-start retry");
        }
        AnalysisOutcome::PartialSuccess { .. } => {
            warn!(case_id = %case_id, "analysis returned without a completed result");
        }
        AnalysisOutcome::Failed { message } => {
            error!(case_id = %case_id, message = %message, "analysis failed");
        }
        AnalysisOutcome::TimedOut => {
            error!(case_id = %case_id, "analysis timed out");
        }
    }
}
