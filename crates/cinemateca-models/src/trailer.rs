use serde::{Deserialize, Serialize};

pub const DEFAULT_TRAILER_SITE: &str = "YouTube";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub id: String,
    pub name: String,
    /// Site-specific video key (the YouTube video id for YouTube trailers)
    pub provider_key: String,
    pub site: String,
    pub kind: String,
}

impl Trailer {
    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case(DEFAULT_TRAILER_SITE)
    }

    /// Watch URL for the sites we know how to link to
    pub fn watch_url(&self) -> Option<String> {
        if self.provider_key.is_empty() {
            return None;
        }
        if self.is_youtube() {
            Some(format!("https://www.youtube.com/watch?v={}", self.provider_key))
        } else if self.site.eq_ignore_ascii_case("vimeo") {
            Some(format!("https://vimeo.com/{}", self.provider_key))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailer(site: &str, key: &str) -> Trailer {
        Trailer {
            id: "v1".to_string(),
            name: "Official Trailer".to_string(),
            provider_key: key.to_string(),
            site: site.to_string(),
            kind: "Trailer".to_string(),
        }
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            trailer("YouTube", "abc123").watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(
            trailer("Vimeo", "42").watch_url().as_deref(),
            Some("https://vimeo.com/42")
        );
        assert_eq!(trailer("Dailymotion", "x").watch_url(), None);
        assert_eq!(trailer("YouTube", "").watch_url(), None);
    }
}
