//! Metrics and Monitoring Adapters
//!
//! Provides Prometheus metrics export on :9090 and health check
//! handlers (/live, /ready, /health) mounted on the API router.

pub mod health;
pub mod prometheus;

pub use self::health::HealthState;
pub use self::prometheus::MetricsRegistry;
