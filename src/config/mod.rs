//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Every section has serde defaults, so an empty file (or no file)
//! yields a runnable service. Fallback venue data used when a request
//! omits market statistics lives here - nothing is hardcoded in the
//! use-case layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::{LmsrModel, OrderBookModel, PriceLevel};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  #[serde(default)]
  pub service: ServiceConfig,
  /// HTTP API server.
  #[serde(default)]
  pub server: ServerConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
  /// Synthetic venue generation.
  #[serde(default)]
  pub synth: SynthConfig,
  /// Venue models used when a request carries no statistics.
  #[serde(default)]
  pub fallback: FallbackConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// HTTP API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// API bind address.
  #[serde(default = "default_server_addr")]
  pub bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_server_addr(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
    }
  }
}

/// Synthetic order-book generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthConfig {
  /// Fixed jitter seed; entropy-seeded per request when absent.
  pub jitter_seed: Option<u64>,
}

/// One fallback order-book level.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FallbackLevel {
  pub price: f64,
  pub size: f64,
}

/// Fallback order book.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackOrderBook {
  #[serde(default = "default_ob_name")]
  pub venue_name: String,
  #[serde(default = "default_levels")]
  pub levels: Vec<FallbackLevel>,
}

impl Default for FallbackOrderBook {
  fn default() -> Self {
    Self {
      venue_name: default_ob_name(),
      levels: default_levels(),
    }
  }
}

/// Fallback LMSR market maker.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackLmsr {
  #[serde(default = "default_lmsr_name")]
  pub venue_name: String,
  #[serde(default = "default_lmsr_shares")]
  pub yes_shares: f64,
  #[serde(default = "default_lmsr_shares")]
  pub no_shares: f64,
  /// Liquidity parameter (b). Higher = flatter price curve.
  #[serde(default = "default_liquidity")]
  pub liquidity_parameter: f64,
}

impl Default for FallbackLmsr {
  fn default() -> Self {
    Self {
      venue_name: default_lmsr_name(),
      yes_shares: default_lmsr_shares(),
      no_shares: default_lmsr_shares(),
      liquidity_parameter: default_liquidity(),
    }
  }
}

/// Venue models used when a request omits the matching statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FallbackConfig {
  #[serde(default)]
  pub order_book: FallbackOrderBook,
  #[serde(default)]
  pub lmsr: FallbackLmsr,
}

impl FallbackConfig {
  /// Fallback order book as a domain model (all levels YES).
  pub fn order_book_model(&self) -> OrderBookModel {
    let levels = self
      .order_book
      .levels
      .iter()
      .map(|l| PriceLevel::yes(l.price, l.size))
      .collect();
    OrderBookModel::new(self.order_book.venue_name.clone(), levels)
  }

  /// Fallback LMSR state as a domain model.
  pub fn lmsr_model(&self) -> LmsrModel {
    LmsrModel::new(
      self.lmsr.venue_name.clone(),
      self.lmsr.yes_shares,
      self.lmsr.no_shares,
      self.lmsr.liquidity_parameter,
    )
  }
}

// Default value functions for serde

fn default_name() -> String {
  "split-router".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_server_addr() -> String {
  "0.0.0.0:3001".to_string()
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_ob_name() -> String {
  "Default OrderBook".to_string()
}

fn default_lmsr_name() -> String {
  "Default LMSR".to_string()
}

fn default_levels() -> Vec<FallbackLevel> {
  [
    (0.45, 1000.0),
    (0.47, 800.0),
    (0.49, 600.0),
    (0.51, 600.0),
    (0.53, 800.0),
    (0.55, 1000.0),
  ]
  .into_iter()
  .map(|(price, size)| FallbackLevel { price, size })
  .collect()
}

fn default_lmsr_shares() -> f64 {
  1500.0
}

fn default_liquidity() -> f64 {
  500.0
}
