use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("workflow API returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("card {0} not found")]
    CardNotFound(String),

    #[error("no matching report field on card {0}")]
    FieldNotFound(String),

    #[error("mutation response did not echo card {0}")]
    UpdateNotConfirmed(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
