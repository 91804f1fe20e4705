use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two parallel content types of the upstream catalog.
///
/// The same value selects the detail endpoint (`/movie/{id}` vs `/tv/{id}`)
/// and the genre ontology used for id lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the upstream catalog API
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = InvalidMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            _ => Err(InvalidMediaKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Returned when a string is neither `movie` nor `tv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMediaKind {
    pub value: String,
}

impl fmt::Display for InvalidMediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid content type '{}', expected 'movie' or 'tv'", self.value)
    }
}

impl std::error::Error for InvalidMediaKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_kind() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!(" TV ".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        let err = "series".parse::<MediaKind>().unwrap_err();
        assert_eq!(err.value, "series");
    }

    #[test]
    fn test_media_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaKind::Tv).unwrap(), "\"tv\"");
    }
}
