//! API Server - axum Router for the Split Router Service
//!
//! Routes:
//! - `POST /api/optimal-split` - route a budget across the two venues
//! - `GET /health`, `/live`, `/ready` - health probes
//!
//! Every rejection is answered as `{ success: false, error }`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};

use super::types::{OptimalSplitRequest, OptimalSplitResponse, SplitPayload};
use crate::adapters::metrics::{health, HealthState, MetricsRegistry};
use crate::domain::{MarketStatistics, RouterError};
use crate::usecases::{RouteError, RouteRequest, SplitRouter};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    router: Arc<SplitRouter>,
    metrics: Option<Arc<MetricsRegistry>>,
    health: HealthState,
}

impl AppState {
    pub fn new(
        router: Arc<SplitRouter>,
        metrics: Option<Arc<MetricsRegistry>>,
        health: HealthState,
    ) -> Self {
        Self {
            router,
            metrics,
            health,
        }
    }

    fn record_rejection(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome("rejected");
        }
    }
}

/// Build the axum router with all API and health routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/optimal-split", post(optimal_split))
        .route("/health", get(health_report))
        .route("/live", get(health::liveness))
        .route("/ready", get(ready))
        .with_state(state)
}

/// Convert the wire request into a domain request. The budget is
/// checked before any statistics are parsed.
fn to_route_request(request: &OptimalSplitRequest) -> Result<RouteRequest, RouteError> {
    let budget = match request.budget {
        Some(budget) if budget.is_finite() && budget > 0.0 => budget,
        _ => return Err(RouteError::InvalidBudget),
    };
    let polymarket_stats = request
        .polymarket_stats
        .as_ref()
        .map(MarketStatistics::try_from)
        .transpose()?;
    let omen_stats = request
        .omen_stats
        .as_ref()
        .map(MarketStatistics::try_from)
        .transpose()?;

    Ok(RouteRequest {
        budget,
        polymarket_stats,
        omen_stats,
    })
}

/// Status code for a refused route: caller mistakes are 400, a broken
/// fallback venue is a server fault.
const fn status_for(err: &RouteError) -> StatusCode {
    match err {
        RouteError::InvalidBudget
        | RouteError::MissingMarketData
        | RouteError::Domain(
            RouterError::InvalidBudget(_) | RouterError::InvalidMarketStatistics(_),
        ) => StatusCode::BAD_REQUEST,
        RouteError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/optimal-split`
#[instrument(skip_all)]
pub async fn optimal_split(
    State(state): State<AppState>,
    payload: Result<Json<OptimalSplitRequest>, JsonRejection>,
) -> (StatusCode, Json<OptimalSplitResponse>) {
    let started = Instant::now();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Malformed optimal-split body");
            state.record_rejection();
            return (
                StatusCode::BAD_REQUEST,
                Json(OptimalSplitResponse::failure(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))),
            );
        }
    };

    let routed =
        to_route_request(&request).and_then(|route_request| state.router.route(&route_request));

    match routed {
        Ok(routed) => {
            let budget = routed.analysis.budget;
            let optimal = routed.analysis.optimal.clone();
            if let Some(metrics) = &state.metrics {
                #[allow(clippy::cast_precision_loss)]
                let latency_us = started.elapsed().as_micros() as f64;
                metrics.record_split(
                    latency_us,
                    routed.analysis.improvement_shares,
                    optimal.order_book_allocation / budget,
                );
            }
            let payload = SplitPayload::new(budget, optimal, &routed.order_book, &routed.lmsr);
            (
                StatusCode::OK,
                Json(OptimalSplitResponse {
                    success: true,
                    request_id: Some(routed.request_id.to_string()),
                    result: Some(payload),
                    error: None,
                }),
            )
        }
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() {
                error!(error = %err, "Optimal split failed");
            } else {
                warn!(error = %err, "Optimal split request rejected");
            }
            state.record_rejection();
            (status, Json(OptimalSplitResponse::failure(err.to_string())))
        }
    }
}

/// `GET /health`
async fn health_report(State(state): State<AppState>) -> impl IntoResponse {
    health::health(&state.health).await
}

/// `GET /ready`
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    health::readiness(&state.health).await
}

/// axum HTTP server for the routing API.
pub struct ApiServer {
    state: AppState,
    bind_address: String,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(state: AppState, bind_address: impl Into<String>) -> Self {
        Self {
            state,
            bind_address: bind_address.into(),
        }
    }

    /// Serve until a shutdown signal is broadcast.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = build_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        info!(address = %self.bind_address, "Split router API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
