pub mod cli;
pub mod config;
pub mod core;
pub mod providers;

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::core::Converter;
use crate::providers::boc_valet::{BocValetProvider, DEFAULT_BASE_URL};

pub use crate::cli::ConvertArgs;

/// Wires config, provider and converter, then runs either a single
/// conversion (when `one_shot` is given) or the interactive prompt loop.
pub async fn run(config_path: Option<&str>, one_shot: Option<ConvertArgs>) -> Result<()> {
    info!("CAD currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let (base_url, timeout_secs) = config
        .providers
        .boc
        .as_ref()
        .map_or((DEFAULT_BASE_URL, 10), |p| {
            (p.base_url.as_str(), p.timeout_secs)
        });
    let provider = BocValetProvider::new(base_url, Duration::from_secs(timeout_secs))?;
    let converter = Converter::new(provider);

    match one_shot {
        Some(args) => cli::run_once(&converter, &args).await,
        None => cli::prompt::run_interactive(&converter).await,
    }
}
