//! CLI subcommands and the loading helpers they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod streets;

use std::path::Path;

use tracing::{debug, info};

use cellparse_core::models::config::{CatalogConfig, CellparseConfig};
use cellparse_core::{FieldRouter, StreetCatalog};

/// Load configuration from `config_path`, or use defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CellparseConfig> {
    let config = match config_path {
        Some(path) => {
            debug!("Loading configuration from {}", path);
            CellparseConfig::from_file(Path::new(path))?
        }
        None => CellparseConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Build the effective street catalog: built-in table, catalog file, inline entries.
pub fn load_catalog(config: &CatalogConfig) -> anyhow::Result<StreetCatalog> {
    let catalog = StreetCatalog::from_config(config).map_err(|e| match &config.file {
        Some(file) => anyhow::anyhow!("Failed to load street catalog {}: {}", file.display(), e),
        None => e.into(),
    })?;
    info!("Street catalog has {} entries", catalog.len());
    Ok(catalog)
}

/// Build a field router from configuration. `strip_letters` forces letter stripping on.
pub fn build_router(config: &CellparseConfig, strip_letters: bool) -> anyhow::Result<FieldRouter> {
    let catalog = load_catalog(&config.catalog)?;
    let router = FieldRouter::from_config(&config.extraction, catalog);

    Ok(if strip_letters {
        router.with_letter_stripping(true)
    } else {
        router
    })
}
