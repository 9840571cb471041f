//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that the pricing engines and the split
//! optimizer maintain their invariants across random venues and budgets.

use proptest::prelude::*;

use split_router::domain::market::{LmsrModel, OrderBookModel, PriceLevel};
use split_router::domain::{find_optimal_split, lmsr, orderbook};

fn order_book() -> impl Strategy<Value = OrderBookModel> {
    prop::collection::vec((0.01f64..=1.0, 1.0f64..2000.0), 0..16).prop_map(|levels| {
        OrderBookModel::new(
            "prop-ob",
            levels
                .into_iter()
                .map(|(price, size)| PriceLevel::yes(price, size))
                .collect(),
        )
    })
}

fn amm() -> impl Strategy<Value = LmsrModel> {
    (0.0f64..3000.0, 0.0f64..3000.0, 50.0f64..4000.0)
        .prop_map(|(yes, no, b)| LmsrModel::new("prop-amm", yes, no, b))
}

// ── Order-Book Engine Properties ────────────────────────────

proptest! {
    /// More budget never buys fewer shares, and never overspends.
    #[test]
    fn ob_shares_monotone_in_budget(
        book in order_book(),
        budget in 0.0f64..5000.0,
        extra in 0.0f64..5000.0,
    ) {
        let small = orderbook::shares_for_budget(budget, &book).unwrap();
        let large = orderbook::shares_for_budget(budget + extra, &book).unwrap();
        prop_assert!(large.shares + 1e-9 >= small.shares, "{small:?} > {large:?}");
        prop_assert!(small.cost <= budget + 1e-9, "cost {} > budget {budget}", small.cost);
        prop_assert!(small.shares >= 0.0);
    }

    /// Marginal price never falls as more shares are taken.
    #[test]
    fn ob_marginal_price_non_decreasing(
        book in order_book(),
        bought in 0.0f64..20_000.0,
        more in 0.0f64..20_000.0,
    ) {
        let before = orderbook::marginal_price(bought, &book);
        let after = orderbook::marginal_price(bought + more, &book);
        prop_assert!(after >= before, "price fell from {before} to {after}");
    }
}

// ── LMSR Engine Properties ──────────────────────────────────

proptest! {
    /// The purchased quantity costs the budget, within tolerance.
    #[test]
    fn lmsr_spends_budget(model in amm(), budget in 0.0f64..5000.0) {
        let fill = lmsr::shares_for_budget(budget, &model).unwrap();
        prop_assert!(fill.shares >= 0.0);
        prop_assert!(fill.cost <= budget + 1e-9);
        prop_assert!(
            (fill.cost - budget).abs() < 1e-3,
            "cost {} vs budget {budget}", fill.cost
        );
        let recomputed = lmsr::cost_to_buy_yes(&model, fill.shares);
        prop_assert!((recomputed - fill.cost).abs() < 1e-6);
    }

    /// LMSR prices stay in [0, 1] and rise with quantity bought.
    #[test]
    fn lmsr_marginal_price_monotone(
        model in amm(),
        bought in 0.0f64..5000.0,
        more in 0.0f64..5000.0,
    ) {
        let before = lmsr::marginal_price(bought, &model);
        let after = lmsr::marginal_price(bought + more, &model);
        prop_assert!((0.0..=1.0).contains(&before));
        prop_assert!(after >= before, "price fell from {before} to {after}");
    }
}

// ── Split Optimizer Properties ──────────────────────────────

proptest! {
    /// Allocations always account for the whole budget.
    #[test]
    fn allocations_sum_to_budget(
        book in order_book(),
        model in amm(),
        budget in 0.0f64..5000.0,
    ) {
        let result = find_optimal_split(budget, &book, &model).unwrap();
        prop_assert!(result.order_book_allocation >= 0.0);
        prop_assert!(result.lmsr_allocation >= 0.0);
        prop_assert!(
            (result.order_book_allocation + result.lmsr_allocation - budget).abs() < 1e-6
        );
        prop_assert!(
            (result.total_shares - result.order_book_shares - result.lmsr_shares).abs() < 1e-9
        );
        prop_assert!(result.total_cost <= budget + 1e-6);
    }

    /// Splitting is never worse than the best single venue.
    #[test]
    fn split_dominates_single_venues(
        book in order_book(),
        model in amm(),
        budget in 0.0f64..5000.0,
    ) {
        let result = find_optimal_split(budget, &book, &model).unwrap();
        let pure_ob = orderbook::shares_for_budget(budget, &book).unwrap();
        let pure_amm = lmsr::shares_for_budget(budget, &model).unwrap();
        prop_assert!(
            result.total_shares + 1e-9 >= pure_ob.shares.max(pure_amm.shares),
            "{result:?} vs ob {pure_ob:?} / amm {pure_amm:?}"
        );
    }
}
