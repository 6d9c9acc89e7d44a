//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod normalize;
pub mod process;

use std::path::Path;

use recibo_core::ReciboConfig;

/// Load configuration from an explicit path, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ReciboConfig> {
    match config_path {
        Some(path) => Ok(ReciboConfig::from_file(Path::new(path))?),
        None => Ok(ReciboConfig::default()),
    }
}
