// Aggregation of a title's detail record and its sub-resources

use cinemateca_config::CatalogConfig;
use cinemateca_models::{GenreEntry, Media, MediaKind, Wallpaper};
use cinemateca_sources::{CatalogSource, SourceError, SubResource};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, PartialUpstreamFailure};
use crate::genres::genre_entries;
use crate::images::ImageResolver;
use crate::normalize::{
    assemble, empty_credits, empty_images, empty_videos, empty_watch_providers, extract_wallpapers,
    NormalizeContext, SubResources,
};
use crate::resolver::{type_name, RawRecord};

/// Settings the service applies to every request
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub region: String,
    pub placeholder_profile_url: String,
    pub image_base_url: String,
    pub timeout: Duration,
}

impl ServiceSettings {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            region: config.region.to_uppercase(),
            placeholder_profile_url: config.placeholder_profile_url.clone(),
            image_base_url: config.image_base_url.clone(),
            timeout: config.timeout(),
        }
    }

    fn normalize_context(&self) -> NormalizeContext {
        NormalizeContext {
            images: ImageResolver::new(self.image_base_url.clone()),
            placeholder_url: self.placeholder_profile_url.clone(),
            region: self.region.clone(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

/// A normalized title plus every sub-resource that had to be replaced by
/// an empty collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub media: Media,
    pub degraded: Vec<PartialUpstreamFailure>,
}

impl AggregateReport {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }

    pub fn is_degraded(&self, resource: SubResource) -> bool {
        self.degraded.iter().any(|f| f.resource == resource)
    }
}

/// Orchestrates fetches against one catalog source.
///
/// Holds no mutable state, so a single instance can serve concurrent
/// requests behind an `Arc`.
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    settings: ServiceSettings,
    context: NormalizeContext,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>, settings: ServiceSettings) -> Self {
        let context = settings.normalize_context();
        Self {
            source,
            settings,
            context,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Apply the service timeout regardless of what the source enforces itself
    async fn timed<T>(&self, request: impl Future<Output = Result<T, SourceError>>) -> Result<T, SourceError> {
        match tokio::time::timeout(self.settings.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.settings.timeout)),
        }
    }

    async fn fetch_sub_resource(
        &self,
        kind: MediaKind,
        id: &str,
        resource: SubResource,
    ) -> Result<Value, PartialUpstreamFailure> {
        let result = self
            .timed(self.source.get_sub_resource(kind, id, resource))
            .await
            .map_err(|e| e.to_string())
            .and_then(|body| {
                if body.is_object() {
                    Ok(body)
                } else {
                    Err(format!("malformed {} body: expected an object, got {}", resource, type_name(&body)))
                }
            });

        result.map_err(|reason| PartialUpstreamFailure { resource, reason })
    }

    fn log_degraded(&self, kind: MediaKind, id: &str, failure: &PartialUpstreamFailure) {
        warn!(
            "{}: {} for {} {} unavailable, using empty result: {}",
            self.source_name(),
            failure.resource,
            kind,
            id,
            failure.reason
        );
    }

    /// Fetch a title with every sub-resource and report which ones degraded.
    ///
    /// The detail record is required: a 404 or an id-less body is
    /// `NotFound`, any other failure is `Upstream`. Sub-resource failures
    /// never fail the call.
    pub async fn get_media_report(&self, id: &str, kind: MediaKind) -> Result<AggregateReport, CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::NotFound {
                kind,
                id: id.to_string(),
            });
        }

        let started = Instant::now();
        debug!("{}: aggregating {} {}", self.source_name(), kind, id);

        let (detail, credits, videos, watch_providers, images) = futures::join!(
            self.timed(self.source.get_details(kind, id)),
            self.fetch_sub_resource(kind, id, SubResource::Credits),
            self.fetch_sub_resource(kind, id, SubResource::Videos),
            self.fetch_sub_resource(kind, id, SubResource::WatchProviders),
            self.fetch_sub_resource(kind, id, SubResource::Images),
        );

        let detail = detail.map_err(|e| {
            if e.is_not_found() {
                CatalogError::NotFound {
                    kind,
                    id: id.to_string(),
                }
            } else {
                CatalogError::Upstream(e)
            }
        })?;

        let record = RawRecord::classify(detail).map_err(|e| {
            debug!("{}: detail for {} {} rejected: {}", self.source_name(), kind, id, e);
            CatalogError::NotFound {
                kind,
                id: id.to_string(),
            }
        })?;

        let mut degraded = Vec::new();
        // Only logged once the title is known to exist
        let mut or_empty = |result: Result<Value, PartialUpstreamFailure>, empty: fn() -> Value| {
            result.unwrap_or_else(|failure| {
                self.log_degraded(kind, id, &failure);
                degraded.push(failure);
                empty()
            })
        };

        let subs = SubResources {
            credits: or_empty(credits, empty_credits),
            videos: or_empty(videos, empty_videos),
            watch_providers: or_empty(watch_providers, empty_watch_providers),
            images: or_empty(images, empty_images),
        };

        let media = assemble(&record, kind, &subs, &self.context);

        info!(
            "{}: aggregated {} {} '{}' ({:?} shape) in {:?}: {} cast, {} trailers, {} providers, {} wallpapers, {} degraded",
            self.source_name(),
            kind,
            media.id(),
            media.title(),
            record.shape(),
            started.elapsed(),
            media.base().cast.len(),
            media.base().trailers.len(),
            media.base().watch_providers.len(),
            media.base().wallpapers.len(),
            degraded.len()
        );

        Ok(AggregateReport { media, degraded })
    }

    /// Fetch a fully populated `Movie` or `Series`
    pub async fn get_media_by_id(&self, id: &str, kind: MediaKind) -> Result<Media, CatalogError> {
        Ok(self.get_media_report(id, kind).await?.media)
    }

    /// Upstream genre list annotated with canonical ontology names
    pub async fn get_genres(&self, kind: MediaKind) -> Result<Vec<GenreEntry>, CatalogError> {
        let body = self.timed(self.source.get_genres(kind)).await?;
        let entries = genre_entries(&body, kind);
        debug!("{}: {} {} genres", self.source_name(), entries.len(), kind);
        Ok(entries)
    }

    /// Backdrops then posters for one title, empty when the fetch fails
    pub async fn get_wallpapers(&self, id: &str, kind: MediaKind) -> Vec<Wallpaper> {
        match self.fetch_sub_resource(kind, id.trim(), SubResource::Images).await {
            Ok(body) => extract_wallpapers(&body, &self.context.images),
            Err(failure) => {
                self.log_degraded(kind, id.trim(), &failure);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests;
