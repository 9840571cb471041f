//! Logarithmic Market Scoring Rule (LMSR) pricing engine.
//!
//! Binary market with outstanding quantities (q_yes, q_no) and
//! liquidity parameter `b`:
//!
//! ```text
//! C(q)      = b * ln(exp(q_yes/b) + exp(q_no/b))
//! price_yes = exp(q_yes/b) / (exp(q_yes/b) + exp(q_no/b))
//! ```
//!
//! Reference: Hanson (2003) "Combinatorial Information Market Design".
//! All exponentials go through a log-sum-exp form so large `q/b`
//! ratios do not overflow.

use super::error::{ensure_budget, RouterResult};
use super::market::{Fill, LmsrModel};

/// Search stops once the share bracket is narrower than this.
pub const SHARE_TOLERANCE: f64 = 1e-4;

/// Initial share bracket is `[0, budget * INITIAL_BRACKET_FACTOR]`.
const INITIAL_BRACKET_FACTOR: f64 = 10.0;

/// Cap on bracket doublings when the initial bracket is too small.
const MAX_BRACKET_DOUBLINGS: u32 = 64;

/// Cap on bisection steps; guards against brackets wider than f64 can split.
const MAX_BISECTIONS: u32 = 200;

/// `ln(exp(x) + exp(y))` without overflow.
fn log_sum_exp(x: f64, y: f64) -> f64 {
    let hi = x.max(y);
    hi + (-(x - y).abs()).exp().ln_1p()
}

/// LMSR cost function C(q_yes, q_no).
pub fn cost(q_yes: f64, q_no: f64, b: f64) -> f64 {
    b * log_sum_exp(q_yes / b, q_no / b)
}

/// Instantaneous YES price, in (0, 1).
pub fn price_yes(q_yes: f64, q_no: f64, b: f64) -> f64 {
    1.0 / (1.0 + ((q_no - q_yes) / b).exp())
}

/// Instantaneous NO price (1 - `price_yes`).
pub fn price_no(q_yes: f64, q_no: f64, b: f64) -> f64 {
    1.0 - price_yes(q_yes, q_no, b)
}

/// Cost of buying `delta` YES shares from the model's current state.
pub fn cost_to_buy_yes(model: &LmsrModel, delta: f64) -> f64 {
    let before = cost(model.yes_shares, model.no_shares, model.b);
    let after = cost(model.yes_shares + delta, model.no_shares, model.b);
    after - before
}

/// YES price after `additional_yes` more shares have been bought.
pub fn marginal_price(additional_yes: f64, model: &LmsrModel) -> f64 {
    price_yes(model.yes_shares + additional_yes, model.no_shares, model.b)
}

/// Largest YES quantity whose cost fits in `budget`, found by bisection.
///
/// The bracket starts at `[0, 10 * budget]` and is doubled while it
/// still fails to exceed the budget, which only happens at YES prices
/// below 0.1.
///
/// # Errors
/// Rejects a negative or non-finite budget and an invalid model
/// (including `b <= 0`).
pub fn shares_for_budget(budget: f64, model: &LmsrModel) -> RouterResult<Fill> {
    ensure_budget(budget)?;
    model.validate()?;

    if budget == 0.0 {
        return Ok(Fill::EMPTY);
    }

    let mut high = budget * INITIAL_BRACKET_FACTOR;
    for _ in 0..MAX_BRACKET_DOUBLINGS {
        if cost_to_buy_yes(model, high) > budget {
            break;
        }
        high *= 2.0;
    }

    let mut low = 0.0;
    let mut best = Fill::EMPTY;

    for _ in 0..MAX_BISECTIONS {
        if high - low <= SHARE_TOLERANCE {
            break;
        }
        let mid = (low + high) / 2.0;
        if mid <= low || mid >= high {
            break;
        }
        let spent = cost_to_buy_yes(model, mid);
        if spent <= budget {
            best = Fill {
                shares: mid,
                cost: spent,
            };
            low = mid;
        } else {
            high = mid;
        }
    }

    Ok(best)
}
