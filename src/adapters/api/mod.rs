//! HTTP API Adapter
//!
//! axum server exposing the split router over JSON, plus the wire
//! types that translate subgraph statistics into domain statistics.

pub mod server;
pub mod types;

pub use server::{build_router, optimal_split, ApiServer, AppState};
pub use types::{OptimalSplitRequest, OptimalSplitResponse};
