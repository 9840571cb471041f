//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Connects the use cases to the outside world. Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: axum JSON API for optimal-split requests
//! - `metrics`: Prometheus metrics export and health checks

pub mod api;
pub mod metrics;
