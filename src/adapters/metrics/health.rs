//! Health Check Handlers - Liveness and Readiness Probes
//!
//! Exposes /live, /ready and /health for Docker health checks and
//! monitoring. Readiness flips to 503 once shutdown begins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Shared readiness flag polled by the readiness probe.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Whether the service is accepting routing requests.
    accepting: Arc<AtomicBool>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (ready by default).
    pub fn new() -> Self {
        Self {
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Check if the service is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }

    /// Mark the service as draining (readiness probe → 503).
    pub fn begin_shutdown(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }
}

/// Per-service availability in the `/health` report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub optimal_split: &'static str,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub services: ServiceStatus,
}

/// Liveness probe: always returns 200 if the process is running.
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: returns 200 until shutdown begins.
pub async fn readiness(state: &HealthState) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

/// Service health report.
pub async fn health(state: &HealthState) -> Json<HealthReport> {
    let (status, availability) = if state.is_ready() {
        ("healthy", "available")
    } else {
        ("draining", "unavailable")
    };
    Json(HealthReport {
        status,
        timestamp: Utc::now().to_rfc3339(),
        services: ServiceStatus {
            optimal_split: availability,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_clears_readiness() {
        let state = HealthState::new();
        let shared = state.clone();
        assert!(state.is_ready());
        shared.begin_shutdown();
        assert!(!state.is_ready());
    }

    #[tokio::test]
    async fn test_readiness_reports_draining() {
        let state = HealthState::new();
        assert_eq!(readiness(&state).await, (StatusCode::OK, "READY"));

        state.begin_shutdown();
        assert_eq!(
            readiness(&state).await,
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        );

        let Json(report) = health(&state).await;
        assert_eq!(report.status, "draining");
        assert_eq!(report.services.optimal_split, "unavailable");
    }
}
