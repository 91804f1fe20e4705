use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::media_kind::MediaKind;
use crate::people::{Actor, Creator};
use crate::trailer::Trailer;
use crate::wallpaper::Wallpaper;
use crate::watch_provider::WatchProvider;

/// Fields shared by movies and series.
///
/// `id` is always a string even though the upstream catalog uses numeric ids,
/// `rating` is on a 0-10 scale and `genres` holds no duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaBase {
    pub id: String,
    pub title: String,
    pub synopsis: String,
    pub release_date: String,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub rating: f64,
    pub cast: Vec<Actor>,
    pub trailers: Vec<Trailer>,
    pub watch_providers: Vec<WatchProvider>,
    pub wallpapers: Vec<Wallpaper>,
}

impl MediaBase {
    /// Year of `release_date`, accepting both full dates and bare years
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.trim();
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed.year());
        }
        date.get(..4).and_then(|y| y.parse().ok())
    }

    /// First trailer whose kind is exactly "Trailer", else the first video of any kind
    pub fn primary_trailer(&self) -> Option<&Trailer> {
        self.trailers
            .iter()
            .find(|t| t.kind == "Trailer")
            .or_else(|| self.trailers.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(flatten)]
    pub base: MediaBase,
    pub runtime_minutes: u32,
    pub director: Option<Creator>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(flatten)]
    pub base: MediaBase,
    pub season_count: u32,
    pub episode_count: u32,
    pub creators: Vec<Creator>,
}

/// A fully aggregated title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mediaType", rename_all = "lowercase")]
pub enum Media {
    Movie(Movie),
    #[serde(rename = "tv")]
    Series(Series),
}

impl Media {
    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Movie(_) => MediaKind::Movie,
            Media::Series(_) => MediaKind::Tv,
        }
    }

    pub fn base(&self) -> &MediaBase {
        match self {
            Media::Movie(movie) => &movie.base,
            Media::Series(series) => &series.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn title(&self) -> &str {
        &self.base().title
    }

    pub fn as_movie(&self) -> Option<&Movie> {
        match self {
            Media::Movie(movie) => Some(movie),
            Media::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Media::Series(series) => Some(series),
            Media::Movie(_) => None,
        }
    }
}

/// List-row view of a title (favorites, library, listings)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    pub id: String,
    pub kind: MediaKind,
    pub title: String,
    pub poster_url: String,
    pub rating: f64,
    pub release_date: String,
}
