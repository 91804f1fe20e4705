use async_trait::async_trait;
use cinemateca_models::MediaKind;
use serde_json::Value;
use std::fmt;

use crate::error::SourceError;

/// Per-title resources fetched separately from the detail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResource {
    Credits,
    Videos,
    WatchProviders,
    Images,
}

impl SubResource {
    /// Path suffix below `/{kind}/{id}`
    pub fn path(&self) -> &'static str {
        match self {
            SubResource::Credits => "credits",
            SubResource::Videos => "videos",
            SubResource::WatchProviders => "watch/providers",
            SubResource::Images => "images",
        }
    }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubResource::Credits => "credits",
            SubResource::Videos => "videos",
            SubResource::WatchProviders => "watch_providers",
            SubResource::Images => "images",
        };
        f.write_str(name)
    }
}

/// A catalog that serves raw JSON for titles and their sub-resources.
///
/// Implementations return the body untouched; every shape difference is
/// handled by the normalization layer on top.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Core detail record. `SourceError::NotFound` when the title does not exist.
    async fn get_details(&self, kind: MediaKind, id: &str) -> Result<Value, SourceError>;

    async fn get_sub_resource(
        &self,
        kind: MediaKind,
        id: &str,
        resource: SubResource,
    ) -> Result<Value, SourceError>;

    /// Genre list for one content type (`{ "genres": [{ "id", "name" }] }`)
    async fn get_genres(&self, kind: MediaKind) -> Result<Value, SourceError>;
}
