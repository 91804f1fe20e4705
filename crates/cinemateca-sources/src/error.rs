use thiserror::Error;

/// Failure of a single upstream request
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream resource not found")]
    NotFound,

    #[error("upstream request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed upstream body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("source not configured: {0}")]
    NotConfigured(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound)
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            SourceError::Timeout(_) => true,
            SourceError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
