//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    server = %config.server.bind_address,
    metrics = config.metrics.enabled,
    fallback_levels = config.fallback.order_book.levels.len(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    load_config(path)
  } else {
    warn!(path, "Config file not found, using defaults");
    let config = AppConfig::default();
    validate_config(&config)?;
    Ok(config)
  }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Parseable bind addresses
/// - Non-empty venue names
/// - Fallback venues the pricing engines will accept
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.service.name.is_empty(),
    "service.name must not be empty"
  );

  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| {
      format!("Invalid server.bind_address: {}", config.server.bind_address)
    })?;

  if config.metrics.enabled {
    config
      .metrics
      .bind_address
      .parse::<SocketAddr>()
      .with_context(|| {
        format!("Invalid metrics.bind_address: {}", config.metrics.bind_address)
      })?;
  }

  // Fallback venue validation
  anyhow::ensure!(
    !config.fallback.order_book.venue_name.is_empty(),
    "fallback.order_book.venue_name must not be empty"
  );
  anyhow::ensure!(
    !config.fallback.lmsr.venue_name.is_empty(),
    "fallback.lmsr.venue_name must not be empty"
  );
  config
    .fallback
    .order_book_model()
    .validate()
    .context("Invalid fallback order book")?;
  config
    .fallback
    .lmsr_model()
    .validate()
    .context("Invalid fallback LMSR")?;

  Ok(())
}
