//! API Types - Wire Format for the Split Router Endpoint
//!
//! Request and response shapes for `POST /api/optimal-split`.
//! Statistics arrive in the subgraph's shape, where every number is
//! usually a decimal string; plain JSON numbers are accepted too.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{LmsrModel, MarketStatistics, OrderBookModel, RouterError, SplitResult};

/// A numeric field that may be sent as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    fn as_f64(&self, field: &str) -> Result<f64, RouterError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                RouterError::InvalidMarketStatistics(format!("{field} is not a number: {s:?}"))
            })?,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(RouterError::InvalidMarketStatistics(format!(
                "{field} must be finite and non-negative, got {value}"
            )))
        }
    }

    /// Counts truncate toward zero, so "12.7" reads as 12.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn as_count(&self, field: &str) -> Result<u64, RouterError> {
        if let Self::Text(s) = self {
            if let Ok(count) = s.trim().parse::<u64>() {
                return Ok(count);
            }
        }
        Ok(self.as_f64(field)?.trunc() as u64)
    }
}

/// Market statistics as served by the Polymarket subgraph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatsPayload {
    /// Token or condition ID; informational only.
    #[serde(default)]
    pub id: Option<String>,
    pub trades_quantity: NumericField,
    pub buys_quantity: NumericField,
    pub sells_quantity: NumericField,
    pub scaled_collateral_volume: NumericField,
    pub scaled_collateral_buy_volume: NumericField,
    pub scaled_collateral_sell_volume: NumericField,
}

impl TryFrom<&MarketStatsPayload> for MarketStatistics {
    type Error = RouterError;

    fn try_from(payload: &MarketStatsPayload) -> Result<Self, Self::Error> {
        let stats = Self {
            trade_count: payload.trades_quantity.as_count("tradesQuantity")?,
            buy_count: payload.buys_quantity.as_count("buysQuantity")?,
            sell_count: payload.sells_quantity.as_count("sellsQuantity")?,
            total_volume: payload.scaled_collateral_volume.as_f64("scaledCollateralVolume")?,
            buy_volume: payload
                .scaled_collateral_buy_volume
                .as_f64("scaledCollateralBuyVolume")?,
            sell_volume: payload
                .scaled_collateral_sell_volume
                .as_f64("scaledCollateralSellVolume")?,
        };
        stats.validate()?;
        Ok(stats)
    }
}

/// Reads any non-numeric budget (string, null, object) as absent.
fn lenient_budget<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Budget {
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Budget::deserialize(deserializer)? {
        Budget::Number(budget) => Some(budget),
        Budget::Other(_) => None,
    })
}

/// Body of `POST /api/optimal-split`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalSplitRequest {
    #[serde(default, deserialize_with = "lenient_budget")]
    pub budget: Option<f64>,
    #[serde(default)]
    pub polymarket_stats: Option<MarketStatsPayload>,
    #[serde(default)]
    pub omen_stats: Option<MarketStatsPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRatio {
    pub order_book_percent: f64,
    pub lmsr_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Efficiency {
    /// Average price paid across both venues; 0 when nothing was bought.
    pub cost_per_share: f64,
    pub allocation_ratio: AllocationRatio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookSummary {
    pub order_levels: usize,
    pub total_liquidity: f64,
    /// Absent for an empty book.
    pub price_range: Option<PriceRange>,
}

impl From<&OrderBookModel> for OrderBookSummary {
    fn from(book: &OrderBookModel) -> Self {
        Self {
            order_levels: book.level_count(),
            total_liquidity: book.total_liquidity(),
            price_range: book.price_range().map(|(min, max)| PriceRange { min, max }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LmsrSummary {
    pub yes_shares: f64,
    pub no_shares: f64,
    pub liquidity_parameter: f64,
}

impl From<&LmsrModel> for LmsrSummary {
    fn from(model: &LmsrModel) -> Self {
        Self {
            yes_shares: model.yes_shares,
            no_shares: model.no_shares,
            liquidity_parameter: model.b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformData {
    pub order_book: OrderBookSummary,
    pub lmsr: LmsrSummary,
}

/// Split result enriched with efficiency and venue summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPayload {
    #[serde(flatten)]
    pub split: SplitResult,
    pub efficiency: Efficiency,
    pub platform_data: PlatformData,
}

impl SplitPayload {
    /// Build the payload for `split` computed over `book` and `amm`.
    pub fn new(budget: f64, split: SplitResult, book: &OrderBookModel, amm: &LmsrModel) -> Self {
        let cost_per_share = if split.total_shares > 0.0 {
            split.total_cost / split.total_shares
        } else {
            0.0
        };
        let efficiency = Efficiency {
            cost_per_share,
            allocation_ratio: AllocationRatio {
                order_book_percent: split.order_book_allocation / budget * 100.0,
                lmsr_percent: split.lmsr_allocation / budget * 100.0,
            },
        };
        Self {
            split,
            efficiency,
            platform_data: PlatformData {
                order_book: book.into(),
                lmsr: amm.into(),
            },
        }
    }
}

/// Response of `POST /api/optimal-split`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalSplitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SplitPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OptimalSplitResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: None,
            result: None,
            error: Some(error.into()),
        }
    }
}
