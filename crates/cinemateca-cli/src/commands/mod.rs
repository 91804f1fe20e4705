pub mod config;
pub mod genre;
pub mod get;

use cinemateca_config::Config;
use cinemateca_core::{CatalogService, ServiceSettings};
use cinemateca_sources::TmdbClient;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;

/// Build the service every networked command runs against
pub(crate) fn catalog_service(config: &Config) -> Result<CatalogService> {
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration: {:#}", e))?;

    let client = TmdbClient::from_config(&config.catalog)?;
    debug!(
        "Catalog client for {} (language {}, region {}, timeout {:?})",
        config.catalog.base_url,
        client.language(),
        config.catalog.region,
        client.timeout()
    );

    Ok(CatalogService::new(
        Arc::new(client),
        ServiceSettings::from_config(&config.catalog),
    ))
}
