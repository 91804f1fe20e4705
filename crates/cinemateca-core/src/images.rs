use std::fmt;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Size segment of a CDN image URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W92,
    W185,
    W300,
    W500,
    W780,
    W1280,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W185 => "w185",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns relative upstream image paths into absolute CDN URLs
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
}

impl ImageResolver {
    /// A blank base falls back to [`DEFAULT_IMAGE_BASE_URL`], a scheme-less one
    /// gets `https://` so every resolved URL starts with `http`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() {
            DEFAULT_IMAGE_BASE_URL.to_string()
        } else if trimmed.starts_with("http") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed.trim_start_matches('/'))
        };
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Empty input gives `""`, anything starting with `http` is returned
    /// unchanged, everything else becomes `{base}/{size}/{path}`.
    /// Idempotent on its own output.
    pub fn to_absolute_url(&self, path: Option<&str>, size: ImageSize) -> String {
        let path = match path.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => return String::new(),
        };

        if path.starts_with("http") {
            return path.to_string();
        }

        format!("{}/{}/{}", self.base_url, size, path.trim_start_matches('/'))
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}
