use crate::error::SourceError;
use crate::tmdb::api::{self, RequestContext};
use crate::traits::{CatalogSource, SubResource};
use async_trait::async_trait;
use cinemateca_config::CatalogConfig;
use cinemateca_models::MediaKind;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// reqwest-backed client for the TMDB v3 catalog API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
    language: String,
    timeout: Duration,
}

impl TmdbClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cinemateca/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            language: language.into(),
            timeout,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, SourceError> {
        if config.base_url.trim().is_empty() {
            return Err(SourceError::NotConfigured("catalog.base_url is empty".to_string()));
        }
        if !config.has_api_key() {
            info!("No catalog API key configured, sending unauthenticated requests");
        }

        Self::new(
            config.base_url.clone(),
            config.api_key.clone().filter(|_| config.has_api_key()),
            config.language.clone(),
            config.timeout(),
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn context(&self) -> RequestContext<'_> {
        RequestContext {
            base_url: &self.base_url,
            api_key: self.api_key.as_deref(),
            language: &self.language,
        }
    }

    async fn fetch(&self, path: &str, resource: Option<SubResource>) -> Result<Value, SourceError> {
        api::get_json(&self.client, &self.context(), path, resource)
            .await
            .map_err(|e| match e {
                SourceError::Http(ref inner) if inner.is_timeout() => SourceError::Timeout(self.timeout),
                other => other,
            })
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn get_details(&self, kind: MediaKind, id: &str) -> Result<Value, SourceError> {
        self.fetch(&api::detail_path(kind, id), None).await
    }

    async fn get_sub_resource(
        &self,
        kind: MediaKind,
        id: &str,
        resource: SubResource,
    ) -> Result<Value, SourceError> {
        self.fetch(&api::sub_resource_path(kind, id, resource), Some(resource))
            .await
    }

    async fn get_genres(&self, kind: MediaKind) -> Result<Value, SourceError> {
        self.fetch(&api::genre_list_path(kind), None).await
    }
}
