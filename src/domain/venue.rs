//! Common interface over the two venue pricing engines.
//!
//! The split optimizer only needs to ask a venue how many shares a
//! budget buys; it never cares whether the curve behind it is a
//! discrete ladder or a continuous market maker.

use super::error::RouterResult;
use super::market::{Fill, LmsrModel, OrderBookModel};
use super::{lmsr, orderbook};

/// A venue that sells YES shares against a budget.
pub trait Venue {
    /// Display name of the venue.
    fn venue_name(&self) -> &str;

    /// Price of the next share after `already_bought` shares.
    ///
    /// Non-decreasing in `already_bought`; `f64::INFINITY` when the
    /// venue has no liquidity left.
    fn marginal_price(&self, already_bought: f64) -> f64;

    /// Shares obtained for `budget` and the amount actually spent.
    ///
    /// # Errors
    /// Rejects a negative or non-finite budget and invalid venue state.
    fn fill_for_budget(&self, budget: f64) -> RouterResult<Fill>;
}

impl Venue for OrderBookModel {
    fn venue_name(&self) -> &str {
        &self.venue_name
    }

    fn marginal_price(&self, already_bought: f64) -> f64 {
        orderbook::marginal_price(already_bought, self)
    }

    fn fill_for_budget(&self, budget: f64) -> RouterResult<Fill> {
        orderbook::shares_for_budget(budget, self)
    }
}

impl Venue for LmsrModel {
    fn venue_name(&self) -> &str {
        &self.venue_name
    }

    fn marginal_price(&self, already_bought: f64) -> f64 {
        lmsr::marginal_price(already_bought, self)
    }

    fn fill_for_budget(&self, budget: f64) -> RouterResult<Fill> {
        lmsr::shares_for_budget(budget, self)
    }
}
