//! Strategy comparison: optimal split against each single venue.

use serde::Serialize;

use super::error::RouterResult;
use super::market::{Fill, LmsrModel, OrderBookModel, SplitResult};
use super::{lmsr, orderbook, splitter};

/// Improvements at or below this many shares count as "no gain".
pub const MEANINGFUL_IMPROVEMENT: f64 = 0.001;

/// Optimal split alongside both single-venue alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAnalysis {
    pub budget: f64,
    pub optimal: SplitResult,
    pub pure_order_book: Fill,
    pub pure_lmsr: Fill,
    pub pure_order_book_avg_price: Option<f64>,
    pub pure_lmsr_avg_price: Option<f64>,
    /// Shares from the better of the two single venues.
    pub best_single_venue_shares: f64,
    /// Extra shares the split buys over the best single venue.
    pub improvement_shares: f64,
    /// `improvement_shares` as a percentage; 0 when no single venue fills.
    pub improvement_percent: f64,
    pub split_beneficial: bool,
}

/// Runs the optimizer and both pure strategies for `budget`.
///
/// # Errors
/// Same rejections as [`splitter::find_optimal_split`].
pub fn analyze_split(
    budget: f64,
    order_book: &OrderBookModel,
    amm: &LmsrModel,
) -> RouterResult<SplitAnalysis> {
    let optimal = splitter::find_optimal_split(budget, order_book, amm)?;
    let pure_order_book = orderbook::shares_for_budget(budget, order_book)?;
    let pure_lmsr = lmsr::shares_for_budget(budget, amm)?;

    let best_single = pure_order_book.shares.max(pure_lmsr.shares);
    let improvement = optimal.total_shares - best_single;
    let improvement_percent = if best_single > 0.0 {
        improvement / best_single * 100.0
    } else {
        0.0
    };

    Ok(SplitAnalysis {
        budget,
        optimal,
        pure_order_book,
        pure_lmsr,
        pure_order_book_avg_price: pure_order_book.average_price(),
        pure_lmsr_avg_price: pure_lmsr.average_price(),
        best_single_venue_shares: best_single,
        improvement_shares: improvement,
        improvement_percent,
        split_beneficial: improvement > MEANINGFUL_IMPROVEMENT,
    })
}
