//! Split Router - Optimal Budget Routing Use Case
//!
//! Orchestrates one routing request:
//! 1. Validates the budget and that some market data is present
//! 2. Derives the order book from Polymarket statistics, or falls back
//! 3. Derives the LMSR state from Omen statistics, or falls back
//! 4. Runs the optimizer and the single-venue comparison
//!
//! Stateless across calls: every request builds fresh venue models.

use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{FallbackConfig, SynthConfig};
use crate::domain::{
  analyze_split, derive_lmsr, derive_order_book, LmsrModel, MarketStatistics, OrderBookModel,
  RandomJitter, RouterError, SplitAnalysis,
};

/// Venue name for order books synthesized from Polymarket statistics.
pub const POLYMARKET_ORDER_BOOK: &str = "Polymarket OrderBook";
/// Venue name for LMSR states synthesized from Omen statistics.
pub const OMEN_LMSR: &str = "Omen LMSR AMM";

/// Why a routing request was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
  #[error("Invalid budget amount")]
  InvalidBudget,

  #[error("At least one market data source is required")]
  MissingMarketData,

  #[error(transparent)]
  Domain(#[from] RouterError),
}

/// A routing request in domain terms.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
  pub budget: f64,
  /// Statistics for the order-book venue.
  pub polymarket_stats: Option<MarketStatistics>,
  /// Statistics for the LMSR venue.
  pub omen_stats: Option<MarketStatistics>,
}

/// Result of routing, with the venue models it was computed against.
#[derive(Debug, Clone)]
pub struct RoutedSplit {
  pub request_id: Uuid,
  pub analysis: SplitAnalysis,
  pub order_book: OrderBookModel,
  pub lmsr: LmsrModel,
}

/// Stateless routing service.
#[derive(Debug, Clone)]
pub struct SplitRouter {
  /// Venues used when a request carries no statistics.
  fallback: FallbackConfig,
  /// Jitter seeding for synthesized order books.
  synth: SynthConfig,
}

impl SplitRouter {
  /// Create a router with fallback venues and jitter settings.
  pub fn new(fallback: FallbackConfig, synth: SynthConfig) -> Self {
    Self { fallback, synth }
  }

  /// Build the order-book venue for a request.
  fn order_book_for(&self, stats: Option<&MarketStatistics>) -> Result<OrderBookModel, RouteError> {
    let Some(stats) = stats else {
      return Ok(self.fallback.order_book_model());
    };
    stats.validate()?;

    let mut jitter = match self.synth.jitter_seed {
      Some(seed) => RandomJitter::seeded(seed),
      None => RandomJitter::from_entropy(),
    };
    Ok(derive_order_book(stats, POLYMARKET_ORDER_BOOK, &mut jitter))
  }

  /// Build the LMSR venue for a request.
  fn lmsr_for(&self, stats: Option<&MarketStatistics>) -> Result<LmsrModel, RouteError> {
    let Some(stats) = stats else {
      return Ok(self.fallback.lmsr_model());
    };
    stats.validate()?;
    Ok(derive_lmsr(stats, OMEN_LMSR))
  }

  /// Route `request.budget` across the two venues.
  ///
  /// # Errors
  /// - `InvalidBudget` for a missing, zero, negative or non-finite budget
  /// - `MissingMarketData` when neither statistics source is present
  /// - `Domain` for invalid statistics or fallback venues
  #[instrument(
    skip(self, request),
    fields(budget = request.budget, request_id = tracing::field::Empty)
  )]
  pub fn route(&self, request: &RouteRequest) -> Result<RoutedSplit, RouteError> {
    let request_id = Uuid::new_v4();
    tracing::Span::current().record("request_id", tracing::field::display(request_id));

    if !(request.budget.is_finite() && request.budget > 0.0) {
      return Err(RouteError::InvalidBudget);
    }
    if request.polymarket_stats.is_none() && request.omen_stats.is_none() {
      return Err(RouteError::MissingMarketData);
    }

    let order_book = self.order_book_for(request.polymarket_stats.as_ref())?;
    let lmsr = self.lmsr_for(request.omen_stats.as_ref())?;

    let analysis = analyze_split(request.budget, &order_book, &lmsr)?;

    debug!(
      order_book = %order_book.venue_name,
      levels = order_book.level_count(),
      lmsr = %lmsr.venue_name,
      b = lmsr.b,
      pure_ob_shares = analysis.pure_order_book.shares,
      pure_lmsr_shares = analysis.pure_lmsr.shares,
      best_single = analysis.best_single_venue_shares,
      improvement_pct = analysis.improvement_percent,
      "Strategy comparison"
    );

    info!(
      strategy = %analysis.optimal.strategy,
      total_shares = analysis.optimal.total_shares,
      total_cost = analysis.optimal.total_cost,
      split_beneficial = analysis.split_beneficial,
      "Optimal split computed"
    );

    Ok(RoutedSplit {
      request_id,
      analysis,
      order_book,
      lmsr,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn router() -> SplitRouter {
    SplitRouter::new(FallbackConfig::default(), SynthConfig { jitter_seed: Some(11) })
  }

  fn stats(index: usize) -> MarketStatistics {
    MarketStatistics::reference_markets()[index].clone()
  }

  #[test]
  fn test_rejects_bad_budgets() {
    let router = router();
    for budget in [0.0, -5.0, f64::NAN, f64::INFINITY] {
      let request = RouteRequest {
        budget,
        polymarket_stats: Some(stats(0)),
        omen_stats: None,
      };
      assert_eq!(router.route(&request).unwrap_err(), RouteError::InvalidBudget);
    }
  }

  #[test]
  fn test_requires_some_market_data() {
    let request = RouteRequest {
      budget: 100.0,
      ..RouteRequest::default()
    };
    assert_eq!(router().route(&request).unwrap_err(), RouteError::MissingMarketData);
  }

  #[test]
  fn test_polymarket_only_uses_default_lmsr() {
    let request = RouteRequest {
      budget: 500.0,
      polymarket_stats: Some(stats(0)),
      omen_stats: None,
    };
    let routed = router().route(&request).unwrap();
    assert_eq!(routed.order_book.venue_name, POLYMARKET_ORDER_BOOK);
    assert_eq!(routed.lmsr.venue_name, "Default LMSR");
    let optimal = &routed.analysis.optimal;
    assert!((optimal.order_book_allocation + optimal.lmsr_allocation - 500.0).abs() < 1e-6);
  }

  #[test]
  fn test_omen_only_uses_default_book() {
    let request = RouteRequest {
      budget: 500.0,
      polymarket_stats: None,
      omen_stats: Some(stats(1)),
    };
    let routed = router().route(&request).unwrap();
    assert_eq!(routed.order_book.venue_name, "Default OrderBook");
    assert_eq!(routed.order_book.level_count(), 6);
    assert_eq!(routed.lmsr.venue_name, OMEN_LMSR);
  }

  #[test]
  fn test_seeded_router_is_reproducible() {
    let request = RouteRequest {
      budget: 1000.0,
      polymarket_stats: Some(stats(0)),
      omen_stats: Some(stats(1)),
    };
    let a = router().route(&request).unwrap();
    let b = router().route(&request).unwrap();
    assert_eq!(a.order_book, b.order_book);
    assert_eq!(a.analysis.optimal, b.analysis.optimal);
    assert_ne!(a.request_id, b.request_id);
  }

  #[test]
  fn test_invalid_statistics_rejected() {
    let mut bad = stats(2);
    bad.total_volume = -1.0;
    let request = RouteRequest {
      budget: 100.0,
      polymarket_stats: None,
      omen_stats: Some(bad),
    };
    assert!(matches!(
      router().route(&request),
      Err(RouteError::Domain(RouterError::InvalidMarketStatistics(_)))
    ));
  }
}
