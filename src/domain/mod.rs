//! Domain layer - Venue pricing and split optimization.
//!
//! Pure, synchronous, I/O-free logic. Given a budget and two venue
//! models, computes how to divide the budget to maximize YES shares.
//! Venue models come either from caller-supplied data or from
//! aggregate statistics via `synth`.

pub mod analysis;
pub mod error;
pub mod lmsr;
pub mod market;
pub mod orderbook;
pub mod splitter;
pub mod synth;
pub mod venue;

// Re-export core types for convenience
pub use analysis::{analyze_split, SplitAnalysis};
pub use error::{RouterError, RouterResult};
pub use market::{
    Fill, LmsrModel, MarketStatistics, OrderBookModel, Outcome, PriceLevel, SplitResult,
    Strategy,
};
pub use splitter::find_optimal_split;
pub use synth::{derive_lmsr, derive_order_book, JitterSource, NoJitter, RandomJitter};
pub use venue::Venue;
