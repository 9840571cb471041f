//! Prometheus Metrics Registry - Routing Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers request outcomes, optimization latency, and how much the
//! split gains over the best single venue.

use std::sync::Arc;

use anyhow::Context;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

/// Centralized Prometheus metrics for the split router.
///
/// All metrics follow the naming convention `split_router_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Requests by outcome (`ok`, `rejected`).
    pub requests: IntCounterVec,
    /// End-to-end routing latency (microseconds).
    pub latency_us: Histogram,
    /// Shares gained by splitting over the best single venue.
    pub improvement_shares: Histogram,
    /// Fraction of the budget routed to the order book.
    pub ob_allocation_ratio: Histogram,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "split_router_requests_total",
                "Optimal-split requests by outcome",
            ),
            &["outcome"],
        )?;

        let latency_us = Histogram::with_opts(
            HistogramOpts::new(
                "split_router_latency_us",
                "Routing latency in microseconds",
            )
            .buckets(vec![50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 10000.0]),
        )?;

        let improvement_shares = Histogram::with_opts(
            HistogramOpts::new(
                "split_router_improvement_shares",
                "Extra shares from splitting versus the best single venue",
            )
            .buckets(vec![0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0]),
        )?;

        let ob_allocation_ratio = Histogram::with_opts(
            HistogramOpts::new(
                "split_router_ob_allocation_ratio",
                "Fraction of budget allocated to the order book",
            )
            .buckets(vec![0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0]),
        )?;

        // Register all metrics
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(latency_us.clone()))?;
        registry.register(Box::new(improvement_shares.clone()))?;
        registry.register(Box::new(ob_allocation_ratio.clone()))?;

        Ok(Self {
            registry,
            requests,
            latency_us,
            improvement_shares,
            ob_allocation_ratio,
        })
    }

    /// Count a request with the given outcome label.
    pub fn record_outcome(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    /// Record a successful routing.
    pub fn record_split(&self, latency_us: f64, improvement: f64, ob_ratio: f64) {
        self.record_outcome("ok");
        self.latency_us.observe(latency_us);
        self.improvement_shares.observe(improvement.max(0.0));
        self.ob_allocation_ratio.observe(ob_ratio);
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output was not UTF-8")
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move {
                    match metrics.render() {
                        Ok(body) => (StatusCode::OK, body),
                        Err(e) => {
                            warn!(error = %e, "Metrics scrape failed");
                            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
                        }
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_split() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.record_split(420.0, 12.5, 0.5);
        metrics.record_outcome("rejected");

        let text = metrics.render().unwrap();
        assert!(text.contains("split_router_requests_total{outcome=\"ok\"} 1"));
        assert!(text.contains("split_router_requests_total{outcome=\"rejected\"} 1"));
        assert!(text.contains("split_router_latency_us_count 1"));
    }
}
