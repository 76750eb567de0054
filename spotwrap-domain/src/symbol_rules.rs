//! Symbol trading rules (exchange info).
//!
//! Only the filters the facade reads are modelled field by field; every
//! other filter type collapses into [`SymbolFilter::Other`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading rules for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Trading pair (e.g. "ETHBTC")
    pub symbol: String,
    /// Trading status (e.g. "TRADING")
    #[serde(default)]
    pub status: String,
    /// Base asset
    #[serde(default)]
    pub base_asset: String,
    /// Quote asset
    #[serde(default)]
    pub quote_asset: String,
    /// Trading filters
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

impl SymbolInfo {
    /// The first `LOT_SIZE` filter, if any.
    pub fn lot_size(&self) -> Option<LotSize> {
        self.filters.iter().find_map(|filter| match filter {
            SymbolFilter::LotSize {
                min_qty,
                max_qty,
                step_size,
            } => Some(LotSize {
                min_qty: *min_qty,
                max_qty: *max_qty,
                step_size: *step_size,
            }),
            _ => None,
        })
    }
}

/// Quantity constraints from a `LOT_SIZE` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotSize {
    /// Minimum order quantity
    pub min_qty: Decimal,
    /// Maximum order quantity
    pub max_qty: Decimal,
    /// Quantity increment
    pub step_size: Decimal,
}

/// One entry of a symbol's `filters` list, tagged by `filterType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    /// Price range and tick size
    #[serde(rename = "PRICE_FILTER", rename_all = "camelCase")]
    PriceFilter {
        min_price: Decimal,
        max_price: Decimal,
        tick_size: Decimal,
    },

    /// Quantity range and step size for limit and market orders
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize {
        min_qty: Decimal,
        max_qty: Decimal,
        step_size: Decimal,
    },

    /// Quantity range and step size for market orders
    #[serde(rename = "MARKET_LOT_SIZE", rename_all = "camelCase")]
    MarketLotSize {
        min_qty: Decimal,
        max_qty: Decimal,
        step_size: Decimal,
    },

    /// Legacy minimum notional
    #[serde(rename = "MIN_NOTIONAL", rename_all = "camelCase")]
    MinNotional { min_notional: Decimal },

    /// Notional range
    #[serde(rename = "NOTIONAL", rename_all = "camelCase")]
    Notional {
        min_notional: Decimal,
        #[serde(default)]
        max_notional: Option<Decimal>,
    },

    /// Any filter type not modelled above
    #[serde(other)]
    Other,
}
