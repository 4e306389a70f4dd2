//! HTTP transport to the analysis service.

use std::time::Duration;

use async_trait::async_trait;
use intake_core::AnalysisRequest;
use thiserror::Error;

/// Liveness probe timeout; the probe is informational only.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(30);
/// Invocation timeout: large analyses plus cold-start wake-up time.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(900);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("analysis service timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// One HTTP exchange with the analysis service.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// Raw access to the analysis service endpoints. Owns timeouts, never
/// retry policy — that lives in the invoker.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// GET the liveness endpoint; returns the HTTP status.
    async fn health(&self) -> Result<u16, TransportError>;

    /// POST one analysis request; returns status and raw body.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Reply, TransportError>;
}

/// reqwest-backed [`AnalysisTransport`].
pub struct HttpAnalysis {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysis {
    /// Create a transport for the given analysis service base URL
    /// (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysis {
    async fn health(&self) -> Result<u16, TransportError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        Ok(resp.status().as_u16())
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Reply, TransportError> {
        let resp = self
            .client
            .post(format!("{}/analyze/sync", self.base_url))
            .timeout(ANALYZE_TIMEOUT)
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(Reply { status, body })
    }
}
