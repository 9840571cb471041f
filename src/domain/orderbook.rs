//! Order-book pricing engine.
//!
//! Walks the YES ladder cheapest first. Because level prices are
//! non-decreasing along the ladder, the marginal cost is convex and
//! greedy consumption is optimal for a single venue.

use super::error::{ensure_budget, RouterResult};
use super::market::{Fill, OrderBookModel};

/// Price of the next share after `already_bought` shares have been taken.
///
/// Returns `f64::INFINITY` once the ladder is exhausted.
pub fn marginal_price(already_bought: f64, book: &OrderBookModel) -> f64 {
    let mut cumulative = 0.0;
    for level in book.yes_ladder() {
        if cumulative + level.size > already_bought {
            return level.price;
        }
        cumulative += level.size;
    }
    f64::INFINITY
}

/// Greedily spends `budget` on the cheapest YES levels.
///
/// # Errors
/// Rejects a negative or non-finite budget and malformed levels.
pub fn shares_for_budget(budget: f64, book: &OrderBookModel) -> RouterResult<Fill> {
    ensure_budget(budget)?;
    book.validate()?;

    let mut remaining = budget;
    let mut fill = Fill::EMPTY;

    for level in book.yes_ladder() {
        if remaining <= 0.0 {
            break;
        }
        let shares = (remaining / level.price).min(level.size);
        let cost = shares * level.price;

        fill.shares += shares;
        fill.cost += cost;
        remaining -= cost;
    }

    Ok(fill)
}
