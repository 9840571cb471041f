//! Venue models and result types.
//!
//! Both venue models are immutable value objects built once per pricing
//! request. The engines never mutate them; every purchase is evaluated
//! against a hypothetical post-trade state.

use serde::{Deserialize, Serialize, Serializer};

use super::error::{RouterError, RouterResult};

/// Binary market outcome a price level sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// A single resting level on the order-book venue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price per share, in (0, 1].
    pub price: f64,
    /// Shares available at this price.
    pub size: f64,
    /// Outcome sold at this level.
    pub side: Outcome,
}

impl PriceLevel {
    /// Shorthand for a YES level.
    pub const fn yes(price: f64, size: f64) -> Self {
        Self {
            price,
            size,
            side: Outcome::Yes,
        }
    }

    fn validate(&self) -> RouterResult<()> {
        let price_ok = self.price.is_finite() && self.price > 0.0 && self.price <= 1.0;
        let size_ok = self.size.is_finite() && self.size > 0.0;
        if price_ok && size_ok {
            Ok(())
        } else {
            Err(RouterError::InvalidPriceLevel {
                price: self.price,
                size: self.size,
            })
        }
    }
}

/// Discrete order-book venue.
///
/// Levels may be stored in any order. Consumers must go through
/// [`OrderBookModel::yes_ladder`], which sorts YES levels cheapest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookModel {
    pub venue_name: String,
    pub levels: Vec<PriceLevel>,
}

impl OrderBookModel {
    pub fn new(venue_name: impl Into<String>, levels: Vec<PriceLevel>) -> Self {
        Self {
            venue_name: venue_name.into(),
            levels,
        }
    }

    /// Checks every level, YES or NO.
    pub fn validate(&self) -> RouterResult<()> {
        self.levels.iter().try_for_each(PriceLevel::validate)
    }

    /// YES levels in ascending price order.
    pub fn yes_ladder(&self) -> Vec<PriceLevel> {
        let mut ladder: Vec<PriceLevel> = self
            .levels
            .iter()
            .filter(|level| level.side == Outcome::Yes)
            .copied()
            .collect();
        ladder.sort_by(|a, b| a.price.total_cmp(&b.price));
        ladder
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Sum of all level sizes.
    pub fn total_liquidity(&self) -> f64 {
        self.levels.iter().map(|level| level.size).sum()
    }

    /// `(min, max)` price across all levels, `None` for an empty book.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut prices = self.levels.iter().map(|level| level.price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Binary LMSR automated market maker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LmsrModel {
    pub venue_name: String,
    /// Outstanding YES shares.
    pub yes_shares: f64,
    /// Outstanding NO shares.
    pub no_shares: f64,
    /// Liquidity parameter (b > 0).
    pub b: f64,
}

impl LmsrModel {
    pub fn new(venue_name: impl Into<String>, yes_shares: f64, no_shares: f64, b: f64) -> Self {
        Self {
            venue_name: venue_name.into(),
            yes_shares,
            no_shares,
            b,
        }
    }

    pub fn validate(&self) -> RouterResult<()> {
        if !(self.b.is_finite() && self.b > 0.0) {
            return Err(RouterError::InvalidLiquidityParameter(self.b));
        }
        let shares_ok = |q: f64| q.is_finite() && q >= 0.0;
        if !(shares_ok(self.yes_shares) && shares_ok(self.no_shares)) {
            return Err(RouterError::InvalidShareState {
                yes: self.yes_shares,
                no: self.no_shares,
            });
        }
        Ok(())
    }
}

/// Aggregate trading statistics for one market.
///
/// Only used to synthesize venue models; the optimizer never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub trade_count: u64,
    pub buy_count: u64,
    pub sell_count: u64,
    pub total_volume: f64,
    pub buy_volume: f64,
    pub sell_volume: f64,
}

impl MarketStatistics {
    /// Rejects negative or non-finite volumes.
    pub fn validate(&self) -> RouterResult<()> {
        for (field, value) in [
            ("total_volume", self.total_volume),
            ("buy_volume", self.buy_volume),
            ("sell_volume", self.sell_volume),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RouterError::InvalidMarketStatistics(format!(
                    "{field} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Three markets sampled from Polymarket subgraph data:
    /// high-volume buy-heavy, balanced, and low-volume.
    pub fn reference_markets() -> [Self; 3] {
        [
            Self {
                trade_count: 274,
                buy_count: 213,
                sell_count: 61,
                total_volume: 71_299.132_719,
                buy_volume: 58_693.611_521,
                sell_volume: 12_605.521_198,
            },
            Self {
                trade_count: 156,
                buy_count: 89,
                sell_count: 67,
                total_volume: 34_567.891_234,
                buy_volume: 18_234.567_890,
                sell_volume: 16_333.323_344,
            },
            Self {
                trade_count: 89,
                buy_count: 45,
                sell_count: 44,
                total_volume: 12_456.789_123,
                buy_volume: 6_234.567_890,
                sell_volume: 6_222.221_233,
            },
        ]
    }
}

/// Shares obtained for a budget on one venue, and what they cost.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fill {
    pub shares: f64,
    pub cost: f64,
}

impl Fill {
    pub const EMPTY: Self = Self {
        shares: 0.0,
        cost: 0.0,
    };

    /// Volume-weighted price paid, `None` when nothing was bought.
    pub fn average_price(&self) -> Option<f64> {
        (self.shares > 0.0).then(|| self.cost / self.shares)
    }
}

/// How the budget was divided between the two venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PureOrderBook,
    PureLmsr,
    /// Percent of budget on the order book, strictly between 0 and 100.
    Split { ob_percent: u32 },
}

impl Strategy {
    /// Classifies an integer order-book percentage in [0, 100].
    pub const fn from_ob_percent(ob_percent: u32) -> Self {
        match ob_percent {
            0 => Self::PureLmsr,
            100.. => Self::PureOrderBook,
            p => Self::Split { ob_percent: p },
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PureOrderBook => write!(f, "Pure Order Book"),
            Self::PureLmsr => write!(f, "Pure LMSR"),
            Self::Split { ob_percent } => {
                write!(f, "Split: {ob_percent}% OB, {}% LMSR", 100 - ob_percent)
            }
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    pub order_book_allocation: f64,
    pub lmsr_allocation: f64,
    pub order_book_shares: f64,
    pub lmsr_shares: f64,
    pub total_shares: f64,
    pub total_cost: f64,
    pub strategy: Strategy,
}

impl SplitResult {
    /// Everything on the order book, nothing bought yet.
    pub(crate) const fn unfilled(budget: f64) -> Self {
        Self {
            order_book_allocation: budget,
            lmsr_allocation: 0.0,
            order_book_shares: 0.0,
            lmsr_shares: 0.0,
            total_shares: 0.0,
            total_cost: 0.0,
            strategy: Strategy::PureOrderBook,
        }
    }

    /// The human-readable strategy label.
    pub fn strategy_label(&self) -> String {
        self.strategy.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_ladder_sorted_and_filtered() {
        let book = OrderBookModel::new(
            "test",
            vec![
                PriceLevel::yes(0.55, 100.0),
                PriceLevel {
                    price: 0.10,
                    size: 50.0,
                    side: Outcome::No,
                },
                PriceLevel::yes(0.45, 200.0),
            ],
        );
        let ladder = book.yes_ladder();
        assert_eq!(ladder.len(), 2);
        assert!((ladder[0].price - 0.45).abs() < f64::EPSILON);
        assert!((ladder[1].price - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_book_summary() {
        let book = OrderBookModel::new(
            "test",
            vec![PriceLevel::yes(0.51, 600.0), PriceLevel::yes(0.45, 1000.0)],
        );
        assert_eq!(book.level_count(), 2);
        assert!((book.total_liquidity() - 1600.0).abs() < 1e-9);
        assert_eq!(book.price_range(), Some((0.45, 0.51)));
        assert_eq!(OrderBookModel::new("empty", vec![]).price_range(), None);
    }

    #[test]
    fn test_level_validation() {
        let bad_price = OrderBookModel::new("bad", vec![PriceLevel::yes(0.0, 10.0)]);
        assert!(matches!(
            bad_price.validate(),
            Err(RouterError::InvalidPriceLevel { .. })
        ));
        let bad_size = OrderBookModel::new("bad", vec![PriceLevel::yes(0.5, -1.0)]);
        assert!(bad_size.validate().is_err());
        let full_price = OrderBookModel::new("ok", vec![PriceLevel::yes(1.0, 1.0)]);
        assert!(full_price.validate().is_ok());
    }

    #[test]
    fn test_lmsr_validation() {
        assert!(LmsrModel::new("ok", 0.0, 0.0, 100.0).validate().is_ok());
        assert_eq!(
            LmsrModel::new("zero", 0.0, 0.0, 0.0).validate(),
            Err(RouterError::InvalidLiquidityParameter(0.0))
        );
        assert!(LmsrModel::new("neg", -1.0, 0.0, 100.0).validate().is_err());
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Strategy::from_ob_percent(0).to_string(), "Pure LMSR");
        assert_eq!(Strategy::from_ob_percent(100).to_string(), "Pure Order Book");
        assert_eq!(
            Strategy::from_ob_percent(35).to_string(),
            "Split: 35% OB, 65% LMSR"
        );
    }

    #[test]
    fn test_split_result_serializes_label() {
        let result = SplitResult::unfilled(0.0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy"], "Pure Order Book");
        assert_eq!(json["orderBookAllocation"], 0.0);
    }

    #[test]
    fn test_statistics_validation() {
        let [mut stats, _, _] = MarketStatistics::reference_markets();
        assert!(stats.validate().is_ok());
        stats.sell_volume = -5.0;
        assert!(matches!(
            stats.validate(),
            Err(RouterError::InvalidMarketStatistics(_))
        ));
    }

    #[test]
    fn test_fill_average_price() {
        assert_eq!(Fill::EMPTY.average_price(), None);
        let fill = Fill {
            shares: 200.0,
            cost: 90.0,
        };
        assert!((fill.average_price().unwrap() - 0.45).abs() < 1e-12);
    }
}
