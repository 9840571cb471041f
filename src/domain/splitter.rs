//! Split optimizer.
//!
//! Maximizes `ob.shares(x) + lmsr.shares(budget - x)` over the order-book
//! allocation `x`. The order-book share curve is piecewise linear, so
//! instead of a gradient method this runs a two-phase grid:
//!
//! 1. every 5% of the budget from 0% to 100% (21 points);
//! 2. every 1% within ±5 points of the best coarse percentage.
//!
//! Only a strictly larger share count replaces the incumbent, so ties
//! keep the earlier (coarser) point. The answer is accurate to 1% of
//! the budget; the true optimum may sit between grid points.

use super::error::{ensure_budget, RouterResult};
use super::market::{LmsrModel, OrderBookModel, SplitResult, Strategy};
use super::venue::Venue;

/// Coarse grid spacing, in percent of budget.
pub const COARSE_STEP_PERCENT: u32 = 5;
/// Half-width of the 1% refinement window around the coarse winner.
pub const REFINE_RADIUS_PERCENT: u32 = 5;

/// Evaluates one allocation: `ob_percent`% of `budget` on the order book.
fn evaluate<O, L>(
    budget: f64,
    ob_percent: u32,
    order_book: &O,
    lmsr: &L,
) -> RouterResult<SplitResult>
where
    O: Venue + ?Sized,
    L: Venue + ?Sized,
{
    let ob_budget = if ob_percent >= 100 {
        budget
    } else {
        budget * f64::from(ob_percent) / 100.0
    };
    let lmsr_budget = (budget - ob_budget).max(0.0);

    let ob_fill = order_book.fill_for_budget(ob_budget)?;
    let lmsr_fill = lmsr.fill_for_budget(lmsr_budget)?;

    Ok(SplitResult {
        order_book_allocation: ob_budget,
        lmsr_allocation: lmsr_budget,
        order_book_shares: ob_fill.shares,
        lmsr_shares: lmsr_fill.shares,
        total_shares: ob_fill.shares + lmsr_fill.shares,
        total_cost: ob_fill.cost + lmsr_fill.cost,
        strategy: Strategy::from_ob_percent(ob_percent),
    })
}

/// Grid-searches the best split of `budget` between any two venues.
///
/// With nothing bought at any grid point (including `budget == 0`) the
/// result is "Pure Order Book" with zero shares.
///
/// # Errors
/// Rejects a negative or non-finite budget, and propagates venue
/// validation errors.
pub fn optimize<O, L>(budget: f64, order_book: &O, lmsr: &L) -> RouterResult<SplitResult>
where
    O: Venue + ?Sized,
    L: Venue + ?Sized,
{
    ensure_budget(budget)?;

    let mut best = SplitResult::unfilled(budget);
    let mut best_percent = 100;

    for ob_percent in (0..=100).step_by(COARSE_STEP_PERCENT as usize) {
        let candidate = evaluate(budget, ob_percent, order_book, lmsr)?;
        if candidate.total_shares > best.total_shares {
            best = candidate;
            best_percent = ob_percent;
        }
    }

    let lo = best_percent.saturating_sub(REFINE_RADIUS_PERCENT);
    let hi = (best_percent + REFINE_RADIUS_PERCENT).min(100);
    for ob_percent in lo..=hi {
        let candidate = evaluate(budget, ob_percent, order_book, lmsr)?;
        if candidate.total_shares > best.total_shares {
            best = candidate;
        }
    }

    Ok(best)
}

/// Best split of `budget` between an order book and an LMSR market maker.
///
/// # Errors
/// Rejects a negative or non-finite budget, `b <= 0`, and malformed
/// order-book levels.
pub fn find_optimal_split(
    budget: f64,
    order_book: &OrderBookModel,
    lmsr: &LmsrModel,
) -> RouterResult<SplitResult> {
    optimize(budget, order_book, lmsr)
}
