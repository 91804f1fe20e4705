use cinemateca_models::{InvalidMediaKind, MediaKind};
use cinemateca_sources::{SourceError, SubResource};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that reach the caller of the normalization layer
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: MediaKind, id: String },

    #[error("malformed upstream data: {0}")]
    MalformedUpstreamData(String),

    #[error("invalid content type '{0}', expected 'movie' or 'tv'")]
    InvalidContentType(String),

    #[error(transparent)]
    Upstream(#[from] SourceError),
}

impl From<InvalidMediaKind> for CatalogError {
    fn from(err: InvalidMediaKind) -> Self {
        CatalogError::InvalidContentType(err.value)
    }
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// A sub-resource that failed and was replaced by an empty collection.
///
/// Never surfaced as an error; kept so callers can tell a degraded section
/// apart from one the upstream legitimately returned empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialUpstreamFailure {
    #[serde(serialize_with = "serialize_resource")]
    pub resource: SubResource,
    pub reason: String,
}

impl fmt::Display for PartialUpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unavailable: {}", self.resource, self.reason)
    }
}

fn serialize_resource<S: serde::Serializer>(resource: &SubResource, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(resource)
}
