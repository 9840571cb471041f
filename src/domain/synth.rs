//! Venue model synthesis from aggregate trading statistics.
//!
//! Per-order and per-share data is often unavailable, so both venue
//! models can be derived from trade counts and buy/sell volumes alone.
//! Level sizes carry ±20% jitter drawn from an injected [`JitterSource`];
//! pass [`NoJitter`] or a seeded [`RandomJitter`] for reproducible books.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::market::{LmsrModel, MarketStatistics, OrderBookModel, PriceLevel};

/// Fair-value anchor the synthetic ladder is built around.
const ANCHOR_PRICE: f64 = 0.48;
/// Average order size assumed when a side has no orders.
const DEFAULT_ORDER_SIZE: f64 = 100.0;
/// Smallest size a synthetic level may have.
const MIN_LEVEL_SIZE: f64 = 10.0;
/// Per-level exponential size decay rate.
const SIZE_DECAY: f64 = 0.3;
const MIN_PRICE: f64 = 0.01;
const MAX_PRICE: f64 = 0.99;
/// Synthesized prices sit on a 0.001 grid.
const TICKS_PER_UNIT: f64 = 1000.0;

/// Source of multiplicative size jitter.
pub trait JitterSource {
    /// Next size multiplier, in [0.8, 1.2).
    fn next_factor(&mut self) -> f64;
}

/// Uniform jitter in [0.8, 1.2) drawn from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomJitter<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomJitter<StdRng> {
    /// Reproducible jitter for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Entropy-seeded jitter.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> JitterSource for RandomJitter<R> {
    fn next_factor(&mut self) -> f64 {
        0.8 + self.rng.r#gen::<f64>() * 0.4
    }
}

/// Always returns the midpoint factor 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn next_factor(&mut self) -> f64 {
        1.0
    }
}

/// Levels per side: one per ten orders, between 3 and 8.
fn level_count(orders: u64) -> u32 {
    u32::try_from(orders / 10).unwrap_or(u32::MAX).clamp(3, 8)
}

fn average_size(volume: f64, count: u64) -> f64 {
    if count > 0 {
        volume / count as f64
    } else {
        DEFAULT_ORDER_SIZE
    }
}

/// Rounds to the nearest 0.001 tick, halves away from zero, on the
/// scaled float (so 0.4485 lands on 0.449 but 0.5055 on 0.505).
fn round_to_tick(price: f64) -> f64 {
    (price * TICKS_PER_UNIT).round() / TICKS_PER_UNIT
}

fn level_size(average: f64, depth: u32, jitter: &mut impl JitterSource) -> f64 {
    let decay = (-f64::from(depth) * SIZE_DECAY).exp();
    (average * decay * jitter.next_factor())
        .max(MIN_LEVEL_SIZE)
        .round()
}

/// Builds a synthetic YES ladder from aggregate statistics.
///
/// Buy levels step down from the anchor, sell levels step up from
/// `anchor + spread`. The spread tightens with volume and stays within
/// [0.01, 0.1]. Sell-side levels are labelled YES as well: they are
/// the asks a YES buyer would lift. The result is sorted by price.
pub fn derive_order_book(
    stats: &MarketStatistics,
    venue_name: &str,
    jitter: &mut impl JitterSource,
) -> OrderBookModel {
    let avg_buy = average_size(stats.buy_volume, stats.buy_count);
    let avg_sell = average_size(stats.sell_volume, stats.sell_count);
    let spread = (10_000.0 / stats.total_volume).clamp(0.01, 0.1);

    let buy_levels = level_count(stats.buy_count);
    let sell_levels = level_count(stats.sell_count);
    let mut levels = Vec::with_capacity((buy_levels + sell_levels) as usize);

    for i in 0..buy_levels {
        let offset = f64::from(i + 1) * spread * 0.5;
        let price = (ANCHOR_PRICE - offset).max(MIN_PRICE);
        let size = level_size(avg_buy, i, jitter);
        levels.push(PriceLevel::yes(round_to_tick(price), size));
    }

    for i in 0..sell_levels {
        let offset = f64::from(i + 1) * spread * 0.5;
        let price = (ANCHOR_PRICE + spread + offset).min(MAX_PRICE);
        let size = level_size(avg_sell, i, jitter);
        levels.push(PriceLevel::yes(round_to_tick(price), size));
    }

    levels.sort_by(|a, b| a.price.total_cmp(&b.price));
    OrderBookModel::new(venue_name, levels)
}

/// Derives an LMSR state from aggregate statistics.
///
/// `b` grows with volume and activity; outstanding YES/NO quantities
/// lean toward whichever side saw more volume.
pub fn derive_lmsr(stats: &MarketStatistics, venue_name: &str) -> LmsrModel {
    let base_liquidity = (stats.total_volume / 10.0).clamp(100.0, 2000.0);
    let activity = (stats.trade_count as f64 / 100.0).clamp(0.5, 2.0);
    let b = (base_liquidity * activity).round();

    let directional = stats.buy_volume + stats.sell_volume;
    let buy_ratio = if directional > 0.0 {
        stats.buy_volume / directional
    } else {
        0.5
    };
    let base_shares = (stats.total_volume / 5.0).clamp(500.0, 3000.0);

    let yes_shares = (base_shares * buy_ratio.mul_add(0.4, 0.8)).round();
    let no_shares = (base_shares * (1.0 - buy_ratio).mul_add(0.4, 0.8)).round();

    LmsrModel::new(venue_name, yes_shares, no_shares, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(trades: u64, buys: u64, sells: u64, buy_vol: f64, sell_vol: f64) -> MarketStatistics {
        MarketStatistics {
            trade_count: trades,
            buy_count: buys,
            sell_count: sells,
            total_volume: buy_vol + sell_vol,
            buy_volume: buy_vol,
            sell_volume: sell_vol,
        }
    }

    #[test]
    fn test_reference_book_structure() {
        let [high_volume, _, _] = MarketStatistics::reference_markets();
        let book = derive_order_book(&high_volume, "Polymarket OrderBook", &mut NoJitter);

        // 213 buys -> 8 levels, 61 sells -> 6 levels
        assert_eq!(book.level_count(), 14);
        assert_eq!(book.venue_name, "Polymarket OrderBook");
        assert!(book.levels.windows(2).all(|w| w[0].price <= w[1].price));

        // 10_000 / 71_299 exceeds the cap, so spread = 0.1 and levels step by 0.05
        assert!((book.levels[0].price - 0.08).abs() < 1e-12);
        assert!((book.levels[13].price - 0.88).abs() < 1e-12);
        // best buy level sits at 0.43 with undecayed size avg_buy
        let best_buy = book.levels.iter().find(|l| (l.price - 0.43).abs() < 1e-12).unwrap();
        assert!((best_buy.size - (58_693.611_521f64 / 213.0).round()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_level_counts_clamped() {
        let thin = stats(5, 2, 1, 100.0, 50.0);
        let book = derive_order_book(&thin, "thin", &mut NoJitter);
        assert_eq!(book.level_count(), 6);

        let deep = stats(5000, 2500, 2500, 1e6, 1e6);
        let book = derive_order_book(&deep, "deep", &mut NoJitter);
        assert_eq!(book.level_count(), 16);
    }

    #[test]
    fn test_empty_statistics_use_defaults() {
        let empty = stats(0, 0, 0, 0.0, 0.0);
        let book = derive_order_book(&empty, "empty", &mut NoJitter);
        assert_eq!(book.level_count(), 6);
        // zero volume -> widest spread, best buy at 0.48 - 0.05
        assert!(book.levels.iter().any(|l| (l.price - 0.43).abs() < 1e-12));
        assert!(book.levels.iter().all(|l| l.size >= MIN_LEVEL_SIZE));
        assert!(book.validate().is_ok());

        let lmsr = derive_lmsr(&empty, "empty");
        assert!((lmsr.b - 50.0).abs() < f64::EPSILON);
        assert!((lmsr.yes_shares - 500.0).abs() < f64::EPSILON);
        assert!((lmsr.no_shares - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prices_inside_bounds_and_on_tick() {
        let mut jitter = RandomJitter::seeded(7);
        for market in MarketStatistics::reference_markets() {
            let book = derive_order_book(&market, "ob", &mut jitter);
            for level in &book.levels {
                assert!(level.price > MIN_PRICE && level.price < MAX_PRICE);
                let ticks = level.price * 1000.0;
                assert!((ticks - ticks.round()).abs() < 1e-6, "off tick: {}", level.price);
                assert!((level.size - level.size.round()).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let [market, _, _] = MarketStatistics::reference_markets();
        let a = derive_order_book(&market, "ob", &mut RandomJitter::seeded(42));
        let b = derive_order_book(&market, "ob", &mut RandomJitter::seeded(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tick_rounding_on_scaled_price() {
        assert!((round_to_tick(0.4485) - 0.449).abs() < 1e-12);
        assert!((round_to_tick(0.5305) - 0.531).abs() < 1e-12);
        // 0.5055 * 1000 is just under 505.5
        assert!((round_to_tick(0.5055) - 0.505).abs() < 1e-12);
        assert!((round_to_tick(0.43) - 0.43).abs() < 1e-12);
    }

    #[test]
    fn test_jitter_range() {
        let mut jitter = RandomJitter::seeded(1);
        for _ in 0..1000 {
            let f = jitter.next_factor();
            assert!((0.8..1.2).contains(&f), "factor {f}");
        }
    }

    #[test]
    fn test_reference_lmsr_balanced_market() {
        let [_, balanced, _] = MarketStatistics::reference_markets();
        let lmsr = derive_lmsr(&balanced, "Polymarket LMSR AMM");

        // base liquidity 2000 (clamped), activity 1.56
        assert!((lmsr.b - 3120.0).abs() < f64::EPSILON);
        // base shares 3000 (clamped)
        let ratio = 18_234.567_890 / 34_567.891_234;
        let expected_yes = (3000.0_f64 * (0.8 + ratio * 0.4)).round();
        assert!((lmsr.yes_shares - expected_yes).abs() < f64::EPSILON);
        assert!(lmsr.yes_shares > lmsr.no_shares);
        assert!(lmsr.validate().is_ok());
    }

    #[test]
    fn test_lmsr_clamps() {
        let quiet = stats(10, 5, 5, 50.0, 50.0);
        let lmsr = derive_lmsr(&quiet, "quiet");
        // 100 * 0.5
        assert!((lmsr.b - 50.0).abs() < f64::EPSILON);
        assert!((lmsr.yes_shares - 500.0).abs() < f64::EPSILON);

        let busy = stats(10_000, 5000, 5000, 1e6, 1e6);
        let lmsr = derive_lmsr(&busy, "busy");
        assert!((lmsr.b - 4000.0).abs() < f64::EPSILON);
        assert!((lmsr.yes_shares - 3000.0).abs() < f64::EPSILON);
    }
}
