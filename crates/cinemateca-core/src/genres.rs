//! Fixed genre ontology shared by the movie and tv catalogs.
//!
//! The two upstream ontologies are not isomorphic: several movie genres
//! collapse into one tv genre ("action" and "adventure" are both tv
//! "action & adventure"), and some genres exist on one side only. Conversion
//! between them is therefore lossy.

use cinemateca_models::{GenreEntry, MediaKind};
use serde_json::Value;

use crate::error::CatalogError;
use crate::resolver::{as_u32, fields, resolve, resolve_string};

struct GenreMapping {
    name: &'static str,
    movie: Option<u32>,
    tv: Option<u32>,
    /// Upstream display names and legacy Spanish names, accent-folded
    aliases: &'static [&'static str],
}

impl GenreMapping {
    fn id_for(&self, kind: MediaKind) -> Option<u32> {
        match kind {
            MediaKind::Movie => self.movie,
            MediaKind::Tv => self.tv,
        }
    }

    fn matches(&self, folded: &str) -> bool {
        self.name == folded || self.aliases.contains(&folded)
    }
}

// Entry order matters for reverse lookups: the first match wins.
const ONTOLOGY: &[GenreMapping] = &[
    GenreMapping { name: "action", movie: Some(28), tv: Some(10759), aliases: &["accion", "action & adventure", "accion y aventura", "accion & aventura"] },
    GenreMapping { name: "adventure", movie: Some(12), tv: Some(10759), aliases: &["aventura"] },
    GenreMapping { name: "animation", movie: Some(16), tv: Some(16), aliases: &["animacion"] },
    GenreMapping { name: "comedy", movie: Some(35), tv: Some(35), aliases: &["comedia"] },
    GenreMapping { name: "crime", movie: Some(80), tv: Some(80), aliases: &["crimen"] },
    GenreMapping { name: "documentary", movie: Some(99), tv: Some(99), aliases: &["documental"] },
    GenreMapping { name: "drama", movie: Some(18), tv: Some(18), aliases: &[] },
    GenreMapping { name: "family", movie: Some(10751), tv: Some(10751), aliases: &["familia"] },
    GenreMapping { name: "fantasy", movie: Some(14), tv: Some(10765), aliases: &["fantasia", "sci-fi & fantasy", "sci-fi y fantasia", "ciencia ficcion y fantasia"] },
    GenreMapping { name: "science fiction", movie: Some(878), tv: Some(10765), aliases: &["ciencia ficcion", "sci-fi"] },
    GenreMapping { name: "history", movie: Some(36), tv: None, aliases: &["historia"] },
    GenreMapping { name: "horror", movie: Some(27), tv: None, aliases: &["terror"] },
    GenreMapping { name: "music", movie: Some(10402), tv: None, aliases: &["musica"] },
    GenreMapping { name: "mystery", movie: Some(9648), tv: Some(9648), aliases: &["misterio"] },
    GenreMapping { name: "romance", movie: Some(10749), tv: None, aliases: &[] },
    GenreMapping { name: "thriller", movie: Some(53), tv: None, aliases: &["suspense"] },
    GenreMapping { name: "tv movie", movie: Some(10770), tv: None, aliases: &["pelicula de tv"] },
    GenreMapping { name: "war", movie: Some(10752), tv: Some(10768), aliases: &["belica", "war & politics", "guerra", "war y politica", "belica y politica"] },
    GenreMapping { name: "western", movie: Some(37), tv: Some(37), aliases: &[] },
    GenreMapping { name: "kids", movie: None, tv: Some(10762), aliases: &["infantil", "ninos"] },
    GenreMapping { name: "news", movie: None, tv: Some(10763), aliases: &["noticias"] },
    GenreMapping { name: "reality", movie: None, tv: Some(10764), aliases: &[] },
    GenreMapping { name: "soap", movie: None, tv: Some(10766), aliases: &["telenovela"] },
    GenreMapping { name: "talk", movie: None, tv: Some(10767), aliases: &["talk show", "entrevistas"] },
];

/// Lower-case, trim, strip Spanish accents
fn fold(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

fn find_by_name(name: &str) -> Option<&'static GenreMapping> {
    let folded = fold(name);
    ONTOLOGY.iter().find(|m| m.matches(&folded))
}

/// Id of a genre name in one content type's ontology.
///
/// `None` when the name is unknown or the genre does not exist for `kind`.
pub fn genre_id(name: &str, kind: MediaKind) -> Option<u32> {
    find_by_name(name).and_then(|m| m.id_for(kind))
}

/// [`genre_id`] with the content type given as a string
pub fn genre_id_for(name: &str, content_type: &str) -> Result<Option<u32>, CatalogError> {
    let kind: MediaKind = content_type.parse()?;
    Ok(genre_id(name, kind))
}

/// Translate an id between ontologies with a reverse table scan.
///
/// Not invertible: movie 878 (science fiction) goes to tv 10765, which comes
/// back as movie 14 (fantasy).
pub fn convert_genre_id(id: u32, from: MediaKind, to: MediaKind) -> Option<u32> {
    ONTOLOGY
        .iter()
        .find(|m| m.id_for(from) == Some(id))
        .and_then(|m| m.id_for(to))
}

/// [`convert_genre_id`] with content types given as strings
pub fn convert_genre_id_for(id: u32, from: &str, to: &str) -> Result<Option<u32>, CatalogError> {
    let from: MediaKind = from.parse()?;
    let to: MediaKind = to.parse()?;
    Ok(convert_genre_id(id, from, to))
}

/// Canonical name for an id, first table entry wins
pub fn canonical_name(id: u32, kind: MediaKind) -> Option<&'static str> {
    ONTOLOGY
        .iter()
        .find(|m| m.id_for(kind) == Some(id))
        .map(|m| m.name)
}

/// Every id the ontology knows for `kind`
pub fn known_ids(kind: MediaKind) -> Vec<u32> {
    let mut ids: Vec<u32> = ONTOLOGY.iter().filter_map(|m| m.id_for(kind)).collect();
    ids.dedup();
    ids
}

/// Parse an upstream genre list body and annotate each entry.
/// Entries without a numeric id are skipped.
pub fn genre_entries(list: &Value, kind: MediaKind) -> Vec<GenreEntry> {
    let entries = list
        .get("genres")
        .or_else(|| list.get("generos"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    entries
        .iter()
        .filter_map(|entry| {
            let id = resolve(entry, &fields::ID).and_then(as_u32)?;
            let name = resolve_string(entry, &fields::GENRE_NAME);
            let canonical = canonical_name(id, kind)
                .or_else(|| find_by_name(&name).map(|m| m.name))
                .map(str::to_string);
            Some(GenreEntry { id, name, canonical })
        })
        .collect()
}
