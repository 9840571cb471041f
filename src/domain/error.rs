//! Domain error types.
//!
//! Every pricing and optimization entry point validates its numeric
//! inputs up front and rejects them with one of these variants.
//! Clamps that are part of a derivation (spread, level counts, `b`)
//! are not errors and never surface here.

use thiserror::Error;

/// Rejections raised by the pure domain layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// Budget is negative, NaN or infinite.
    #[error("invalid budget {0}: must be finite and non-negative")]
    InvalidBudget(f64),

    /// LMSR liquidity parameter is not a positive finite number.
    #[error("invalid LMSR liquidity parameter b={0}: must be finite and positive")]
    InvalidLiquidityParameter(f64),

    /// LMSR outstanding share counts are negative or non-finite.
    #[error("invalid LMSR share state: yes={yes}, no={no}")]
    InvalidShareState { yes: f64, no: f64 },

    /// Order-book level with a price outside (0, 1] or a non-positive size.
    #[error("invalid order-book level: price={price}, size={size}")]
    InvalidPriceLevel { price: f64, size: f64 },

    /// Aggregate statistics with negative, non-finite or unparseable fields.
    #[error("invalid market statistics: {0}")]
    InvalidMarketStatistics(String),
}

/// Convenience alias for domain results.
pub type RouterResult<T> = std::result::Result<T, RouterError>;

/// Rejects negative and non-finite budgets.
pub(crate) fn ensure_budget(budget: f64) -> RouterResult<()> {
    if budget.is_finite() && budget >= 0.0 {
        Ok(())
    } else {
        Err(RouterError::InvalidBudget(budget))
    }
}
