pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, LoggingConfig, DEFAULT_PLACEHOLDER_PROFILE_URL};
pub use paths::{PathManager, container_base_path};
