use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use tracing::debug;

use super::AnalyzerConfig;

/// Environment overrides look like `FORECAST_CANDLE_LIMIT=300`.
pub const ENV_PREFIX: &str = "FORECAST";

/// Layers the optional TOML file at `path` and `FORECAST_*` variables over defaults.
pub fn load_config(path: &str) -> Result<AnalyzerConfig> {
    load_with_env(path, Environment::with_prefix(ENV_PREFIX))
}

fn load_with_env(path: &str, env: Environment) -> Result<AnalyzerConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(env.try_parsing(true))
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path))?;

    let config: AnalyzerConfig = settings
        .try_deserialize()
        .context("Configuration has unexpected values")?;

    config
        .validate()
        .map_err(|errors| anyhow!("Invalid configuration: {}", errors.join(", ")))?;

    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}
