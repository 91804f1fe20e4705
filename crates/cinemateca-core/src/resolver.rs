//! Field resolution over heterogeneous upstream objects.
//!
//! Every canonical field that has existed under more than one upstream name is
//! read through a [`FieldSpec`]: an ordered list of candidate keys where the
//! first key that is present and non-null wins. The full precedence table lives
//! in [`fields`].

use cinemateca_models::MediaKind;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::CatalogError;
use crate::genres::canonical_name;

/// Ordered candidate keys for one canonical field.
///
/// Keys may be dotted (`"credits.cast"`) to reach into nested objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl FieldSpec {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }
}

/// Precedence table. Order inside each list is part of the contract.
pub mod fields {
    use super::FieldSpec;

    pub const ID: FieldSpec = FieldSpec::new("id", &["id", "tmdb_id", "tmdbId"]);
    pub const TITLE: FieldSpec = FieldSpec::new(
        "title",
        &["nombre", "titulo", "title", "name", "original_title", "original_name"],
    );
    pub const SYNOPSIS: FieldSpec = FieldSpec::new("synopsis", &["sinopsis", "descripcion", "overview"]);
    pub const RELEASE_DATE: FieldSpec = FieldSpec::new(
        "release_date",
        &["fecha_estreno", "fecha", "release_date", "first_air_date"],
    );
    pub const RATING: FieldSpec = FieldSpec::new("rating", &["vote_average", "puntuacion"]);
    pub const RUNTIME: FieldSpec = FieldSpec::new("runtime", &["duracion", "runtime"]);
    pub const POSTER: FieldSpec = FieldSpec::new("poster", &["poster_path", "poster", "imagen"]);
    pub const BACKDROP: FieldSpec = FieldSpec::new("backdrop", &["backdrop_path", "fondo", "backdrop"]);
    pub const GENRES: FieldSpec = FieldSpec::new("genres", &["genres", "generos", "genre_ids"]);
    pub const GENRE_NAME: FieldSpec = FieldSpec::new("genre_name", &["name", "nombre"]);
    pub const SEASON_COUNT: FieldSpec = FieldSpec::new("season_count", &["number_of_seasons", "temporadas"]);
    pub const EPISODE_COUNT: FieldSpec = FieldSpec::new("episode_count", &["number_of_episodes", "episodios"]);
    pub const CREATORS: FieldSpec = FieldSpec::new("creators", &["created_by", "creadores"]);
    pub const EMBEDDED_CAST: FieldSpec = FieldSpec::new("cast", &["credits.cast", "cast", "reparto"]);
    pub const EMBEDDED_CREW: FieldSpec = FieldSpec::new("crew", &["credits.crew", "crew"]);
    pub const EMBEDDED_VIDEOS: FieldSpec = FieldSpec::new("videos", &["videos.results", "trailers"]);
    pub const BACKDROPS: FieldSpec = FieldSpec::new("backdrops", &["images.backdrops", "backdrops"]);
    pub const POSTERS: FieldSpec = FieldSpec::new("posters", &["images.posters", "posters"]);

    // Members of sub-resource lists
    pub const PERSON_NAME: FieldSpec = FieldSpec::new("person_name", &["name", "nombre"]);
    pub const PHOTO: FieldSpec = FieldSpec::new("photo", &["profile_path", "foto"]);
    pub const CHARACTER: FieldSpec = FieldSpec::new("character", &["character", "personaje"]);
    pub const VIDEO_KEY: FieldSpec = FieldSpec::new("video_key", &["key", "clave"]);
    pub const VIDEO_SITE: FieldSpec = FieldSpec::new("video_site", &["site", "sitio"]);
    pub const VIDEO_KIND: FieldSpec = FieldSpec::new("video_kind", &["type", "tipo"]);
    pub const PROVIDER_ID: FieldSpec = FieldSpec::new("provider_id", &["provider_id", "id"]);
    pub const PROVIDER_NAME: FieldSpec = FieldSpec::new("provider_name", &["provider_name", "name"]);
    pub const LOGO: FieldSpec = FieldSpec::new("logo", &["logo_path", "logo"]);
    pub const FILE_PATH: FieldSpec = FieldSpec::new("file_path", &["file_path", "ruta"]);
    pub const WIDTH: FieldSpec = FieldSpec::new("width", &["width", "ancho"]);
    pub const HEIGHT: FieldSpec = FieldSpec::new("height", &["height", "alto"]);
}

const SPANISH_MARKERS: &[&str] = &[
    "nombre", "titulo", "fecha_estreno", "fecha", "puntuacion", "duracion", "sinopsis", "generos",
    "temporadas", "episodios",
];
const CATALOG_MARKERS: &[&str] = &[
    "poster_path", "backdrop_path", "vote_average", "original_title", "original_name", "first_air_date",
];
const ENGLISH_MARKERS: &[&str] = &["title", "release_date", "runtime", "overview", "name"];

/// Which upstream generation an object most likely came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamShape {
    /// Third-party catalog API
    Catalog,
    /// First-generation internal API (Spanish field names)
    LegacySpanish,
    /// Second-generation internal API (English field names, flat)
    LegacyEnglish,
    Unknown,
}

impl UpstreamShape {
    /// Spanish markers win when an object mixes generations
    pub fn detect(object: &Map<String, Value>) -> Self {
        let has_any = |markers: &[&str]| markers.iter().any(|k| object.get(*k).is_some_and(|v| !v.is_null()));

        if has_any(SPANISH_MARKERS) {
            UpstreamShape::LegacySpanish
        } else if has_any(CATALOG_MARKERS) {
            UpstreamShape::Catalog
        } else if has_any(ENGLISH_MARKERS) {
            UpstreamShape::LegacyEnglish
        } else {
            UpstreamShape::Unknown
        }
    }
}

/// Look up a possibly dotted key
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// First candidate of `spec` that is present and non-null on `value`
pub fn resolve<'a>(value: &'a Value, spec: &FieldSpec) -> Option<&'a Value> {
    spec.keys
        .iter()
        .filter_map(|key| lookup(value, key))
        .find(|v| !v.is_null())
}

/// Like [`resolve`], falling back to `default`
pub fn resolve_or<'a>(value: &'a Value, spec: &FieldSpec, default: &'a Value) -> &'a Value {
    resolve(value, spec).unwrap_or(default)
}

pub fn resolve_string(value: &Value, spec: &FieldSpec) -> String {
    resolve(value, spec).and_then(as_text).unwrap_or_default()
}

/// Numbers arrive as JSON numbers or as strings, with `.` or `,` as decimal separator
pub fn resolve_f64(value: &Value, spec: &FieldSpec) -> f64 {
    resolve(value, spec).and_then(as_f64).unwrap_or(0.0)
}

pub fn resolve_u32(value: &Value, spec: &FieldSpec) -> u32 {
    resolve(value, spec).and_then(as_u32).unwrap_or(0)
}

pub fn resolve_array<'a>(value: &'a Value, spec: &FieldSpec) -> &'a [Value] {
    resolve(value, spec)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Strings as-is, numbers rendered in decimal
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            // Legacy payloads send ids as 550.0
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

pub fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

pub fn as_u32(value: &Value) -> Option<u32> {
    let n = as_f64(value)?;
    if n <= 0.0 {
        Some(0)
    } else {
        Some(n.min(u32::MAX as f64) as u32)
    }
}

/// Rating on a 0-10 scale, 0 when missing or unparsable
pub fn coerce_rating(value: &Value, spec: &FieldSpec) -> f64 {
    resolve_f64(value, spec).clamp(0.0, 10.0)
}

/// Identity of a nested member (cast entry, provider, ...), empty when absent
pub fn member_id(value: &Value, spec: &FieldSpec) -> String {
    resolve(value, spec)
        .and_then(as_text)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// A validated upstream title object.
///
/// Construction guarantees the value is a JSON object carrying a non-empty
/// identity field, so accessors never fail.
#[derive(Debug, Clone)]
pub struct RawRecord {
    shape: UpstreamShape,
    id: String,
    value: Value,
}

impl RawRecord {
    pub fn classify(value: Value) -> Result<Self, CatalogError> {
        let object = value.as_object().ok_or_else(|| {
            CatalogError::MalformedUpstreamData(format!("expected a JSON object, got {}", type_name(&value)))
        })?;

        let shape = UpstreamShape::detect(object);
        let id = member_id(&value, &fields::ID);
        if id.is_empty() {
            return Err(CatalogError::MalformedUpstreamData(
                "record has no usable id".to_string(),
            ));
        }

        Ok(Self { shape, id, value })
    }

    /// Missing input is treated the same as an object without id
    pub fn from_optional(value: Option<Value>) -> Result<Self, CatalogError> {
        match value {
            Some(value) => Self::classify(value),
            None => Err(CatalogError::MalformedUpstreamData("record is missing".to_string())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape(&self) -> UpstreamShape {
        self.shape
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn get(&self, spec: &FieldSpec) -> Option<&Value> {
        resolve(&self.value, spec)
    }

    pub fn string(&self, spec: &FieldSpec) -> String {
        resolve_string(&self.value, spec)
    }

    pub fn count(&self, spec: &FieldSpec) -> u32 {
        resolve_u32(&self.value, spec)
    }

    pub fn rating(&self) -> f64 {
        coerce_rating(&self.value, &fields::RATING)
    }

    pub fn array(&self, spec: &FieldSpec) -> &[Value] {
        resolve_array(&self.value, spec)
    }

    /// Genre names in source order without duplicates (case-insensitive).
    ///
    /// Entries may be `{ id, name }` objects, bare strings or bare ids. Ids
    /// without a name are named through the ontology of `kind`; unknown ids
    /// are dropped.
    pub fn genres(&self, kind: MediaKind) -> Vec<String> {
        let mut seen = HashSet::new();
        self.array(&fields::GENRES)
            .iter()
            .filter_map(|genre| match genre {
                Value::String(name) => Some(name.clone()),
                Value::Number(_) => ontology_name(genre, kind),
                Value::Object(_) => {
                    let name = resolve_string(genre, &fields::GENRE_NAME);
                    if name.trim().is_empty() {
                        resolve(genre, &fields::ID).and_then(|id| ontology_name(id, kind))
                    } else {
                        Some(name)
                    }
                }
                _ => None,
            })
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.to_lowercase()))
            .collect()
    }
}

fn ontology_name(id: &Value, kind: MediaKind) -> Option<String> {
    as_u32(id)
        .and_then(|id| canonical_name(id, kind))
        .map(str::to_string)
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
