//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic for the service's workflows.
//!
//! Use cases:
//! - `SplitRouter`: Venue construction + optimal split + comparison

pub mod split_router;

pub use split_router::{RouteError, RouteRequest, RoutedSplit, SplitRouter};
