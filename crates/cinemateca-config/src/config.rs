use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Grey silhouette shipped inline, used for cast members without a photo
pub const DEFAULT_PLACEHOLDER_PROFILE_URL: &str = concat!(
    "data:image/svg+xml,",
    "%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 185 278'%3E",
    "%3Crect width='185' height='278' fill='%23dbdbdb'/%3E",
    "%3Ccircle cx='92.5' cy='105' r='45' fill='%23b0b0b0'/%3E",
    "%3Cpath d='M22 278c0-50 31-82 70.5-82s70.5 32 70.5 82z' fill='%23b0b0b0'/%3E",
    "%3C/svg%3E"
);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream catalog API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TMDB v3 API key. Also read from `TMDB_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Region whose watch providers are reported (ISO 3166-1 alpha-2)
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Shown for cast members without a profile photo
    #[serde(default = "default_placeholder_profile_url")]
    pub placeholder_profile_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "es-ES".to_string()
}

fn default_region() -> String {
    "ES".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_placeholder_profile_url() -> String {
    DEFAULT_PLACEHOLDER_PROFILE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            region: default_region(),
            timeout_secs: default_timeout_secs(),
            placeholder_profile_url: default_placeholder_profile_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty() && k != "YOUR_API_KEY")
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults.
    /// Environment overrides are applied in both cases.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            debug!("Loading config from {}", path.display());
            Self::load_from_file(path)?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `TMDB_API_KEY`, `CINEMATECA_LANGUAGE` and `CINEMATECA_REGION` from `lookup`.
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = get("TMDB_API_KEY") {
            self.catalog.api_key = Some(api_key);
        }
        if let Some(language) = get("CINEMATECA_LANGUAGE") {
            self.catalog.language = language;
        }
        if let Some(region) = get("CINEMATECA_REGION") {
            self.catalog.region = region.to_uppercase();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let catalog = &self.catalog;

        if catalog.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if !catalog.image_base_url.starts_with("http") {
            return Err(anyhow::anyhow!(
                "catalog.image_base_url must be an absolute http(s) URL, got '{}'",
                catalog.image_base_url
            ));
        }
        if catalog.timeout_secs == 0 {
            return Err(anyhow::anyhow!("catalog.timeout_secs must be greater than zero"));
        }
        if catalog.region.len() != 2 || !catalog.region.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow::anyhow!(
                "catalog.region must be a two-letter country code, got '{}'",
                catalog.region
            ));
        }
        if catalog.language.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.language cannot be empty"));
        }

        Ok(())
    }
}
