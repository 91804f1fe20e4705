//! Assembly of canonical entities from a validated detail record plus its
//! sub-resource bodies.

use cinemateca_config::CatalogConfig;
use cinemateca_models::{
    ImageKind, Media, MediaBase, MediaKind, MediaSummary, Movie, Series, Trailer, Wallpaper,
};
use serde_json::{json, Value};

use crate::credits::{extract_cast, extract_creators, extract_director};
use crate::error::CatalogError;
use crate::images::{ImageResolver, ImageSize};
use crate::providers::providers_for_region;
use crate::resolver::{fields, member_id, resolve, resolve_array, resolve_string, resolve_u32, FieldSpec, RawRecord};

const VIDEO_RESULTS: FieldSpec = FieldSpec::new("video_results", &["results", "videos.results", "trailers"]);
const EMBEDDED_PROVIDERS: FieldSpec =
    FieldSpec::new("watch_providers", &["watch/providers", "watch_providers", "proveedores"]);

/// Settings every normalization step needs
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    pub images: ImageResolver,
    pub placeholder_url: String,
    pub region: String,
}

impl NormalizeContext {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            images: ImageResolver::new(config.image_base_url.clone()),
            placeholder_url: config.placeholder_profile_url.clone(),
            region: config.region.clone(),
        }
    }
}

impl Default for NormalizeContext {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

/// Raw bodies of the four per-title sub-resources
#[derive(Debug, Clone, PartialEq)]
pub struct SubResources {
    pub credits: Value,
    pub videos: Value,
    pub watch_providers: Value,
    pub images: Value,
}

impl SubResources {
    /// What a failed sub-fetch is replaced with
    pub fn empty() -> Self {
        Self {
            credits: empty_credits(),
            videos: empty_videos(),
            watch_providers: empty_watch_providers(),
            images: empty_images(),
        }
    }

    /// Sub-resources carried inside the detail record itself
    /// (`append_to_response` bodies, legacy payloads)
    pub fn embedded_in(record: &RawRecord) -> Self {
        let raw = record.value();
        let mut subs = Self::empty();

        if let Some(credits) = raw.get("credits").filter(|v| v.is_object()) {
            subs.credits = credits.clone();
        } else {
            subs.credits = json!({
                "cast": resolve_array(raw, &fields::EMBEDDED_CAST),
                "crew": resolve_array(raw, &fields::EMBEDDED_CREW),
            });
        }

        subs.videos = json!({ "results": resolve_array(raw, &fields::EMBEDDED_VIDEOS) });

        if let Some(providers) = resolve(raw, &EMBEDDED_PROVIDERS) {
            subs.watch_providers = providers.clone();
        }

        subs.images = json!({
            "backdrops": resolve_array(raw, &fields::BACKDROPS),
            "posters": resolve_array(raw, &fields::POSTERS),
        });

        subs
    }
}

pub fn empty_credits() -> Value {
    json!({ "cast": [] })
}

pub fn empty_videos() -> Value {
    json!({ "results": [] })
}

pub fn empty_watch_providers() -> Value {
    json!({ "results": {} })
}

pub fn empty_images() -> Value {
    json!({ "backdrops": [], "posters": [] })
}

/// Every video of a videos response. Site defaults to YouTube.
pub fn extract_trailers(videos: &Value) -> Vec<Trailer> {
    resolve_array(videos, &VIDEO_RESULTS)
        .iter()
        .map(|video| {
            let site = resolve_string(video, &fields::VIDEO_SITE);
            Trailer {
                id: member_id(video, &fields::ID),
                name: resolve_string(video, &fields::PERSON_NAME),
                provider_key: resolve_string(video, &fields::VIDEO_KEY),
                site: if site.trim().is_empty() {
                    cinemateca_models::trailer::DEFAULT_TRAILER_SITE.to_string()
                } else {
                    site
                },
                kind: resolve_string(video, &fields::VIDEO_KIND),
            }
        })
        .collect()
}

/// Backdrops (original size) followed by posters (w500).
/// Entries without a file path are skipped.
pub fn extract_wallpapers(images_body: &Value, images: &ImageResolver) -> Vec<Wallpaper> {
    let section = |spec: &FieldSpec, kind: ImageKind, size: ImageSize| {
        resolve_array(images_body, spec)
            .iter()
            .filter_map(|image| {
                let path = resolve(image, &fields::FILE_PATH)?.as_str()?.trim();
                if path.is_empty() {
                    return None;
                }
                Some(Wallpaper {
                    id: path.to_string(),
                    kind,
                    url: images.to_absolute_url(Some(path), size),
                    width: resolve_u32(image, &fields::WIDTH),
                    height: resolve_u32(image, &fields::HEIGHT),
                })
            })
            .collect::<Vec<_>>()
    };

    let mut wallpapers = section(&fields::BACKDROPS, ImageKind::Backdrop, ImageSize::Original);
    wallpapers.extend(section(&fields::POSTERS, ImageKind::Poster, ImageSize::W500));
    wallpapers
}

fn image_path<'a>(record: &'a RawRecord, spec: &FieldSpec) -> Option<&'a str> {
    record.get(spec).and_then(Value::as_str)
}

/// Build the canonical entity for `kind` from a record and its sub-resources
pub fn assemble(record: &RawRecord, kind: MediaKind, subs: &SubResources, ctx: &NormalizeContext) -> Media {
    let base = MediaBase {
        id: record.id().to_string(),
        title: record.string(&fields::TITLE),
        synopsis: record.string(&fields::SYNOPSIS),
        release_date: record.string(&fields::RELEASE_DATE),
        genres: record.genres(kind),
        poster_url: ctx.images.to_absolute_url(image_path(record, &fields::POSTER), ImageSize::W500),
        backdrop_url: ctx
            .images
            .to_absolute_url(image_path(record, &fields::BACKDROP), ImageSize::Original),
        rating: record.rating(),
        cast: extract_cast(&subs.credits, &ctx.images, &ctx.placeholder_url),
        trailers: extract_trailers(&subs.videos),
        watch_providers: providers_for_region(&subs.watch_providers, &ctx.region, &ctx.images),
        wallpapers: extract_wallpapers(&subs.images, &ctx.images),
    };

    match kind {
        MediaKind::Movie => Media::Movie(Movie {
            base,
            runtime_minutes: record.count(&fields::RUNTIME),
            director: extract_director(&subs.credits, &ctx.images),
        }),
        MediaKind::Tv => Media::Series(Series {
            base,
            season_count: record.count(&fields::SEASON_COUNT),
            episode_count: record.count(&fields::EPISODE_COUNT),
            creators: extract_creators(record.value(), &ctx.images),
        }),
    }
}

/// Normalize a single self-contained object (legacy internal API payloads,
/// detail bodies fetched with appended sub-resources)
pub fn normalize_media(raw: Value, kind: MediaKind, ctx: &NormalizeContext) -> Result<Media, CatalogError> {
    let record = RawRecord::classify(raw)?;
    let subs = SubResources::embedded_in(&record);
    Ok(assemble(&record, kind, &subs, ctx))
}

/// List-row view of a title
pub fn normalize_summary(raw: Value, kind: MediaKind, ctx: &NormalizeContext) -> Result<MediaSummary, CatalogError> {
    let record = RawRecord::classify(raw)?;
    Ok(MediaSummary {
        id: record.id().to_string(),
        kind,
        title: record.string(&fields::TITLE),
        poster_url: ctx.images.to_absolute_url(image_path(&record, &fields::POSTER), ImageSize::W500),
        rating: record.rating(),
        release_date: record.string(&fields::RELEASE_DATE),
    })
}
