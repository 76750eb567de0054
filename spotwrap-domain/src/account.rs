//! Spot account snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spot account as reported by the exchange.
///
/// `Default` is the empty snapshot: no balances, no permissions, trading
/// flags off. Every field tolerates being absent from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSnapshot {
    /// Maker commission in basis points
    pub maker_commission: i64,
    /// Taker commission in basis points
    pub taker_commission: i64,
    /// Buyer commission in basis points
    pub buyer_commission: i64,
    /// Seller commission in basis points
    pub seller_commission: i64,
    /// Account may trade
    pub can_trade: bool,
    /// Account may withdraw
    pub can_withdraw: bool,
    /// Account may deposit
    pub can_deposit: bool,
    /// Last update (ms since epoch)
    pub update_time: i64,
    /// Account type (e.g. "SPOT")
    pub account_type: String,
    /// Per-asset balances
    pub balances: Vec<Balance>,
    /// Granted permissions (e.g. "SPOT", "MARGIN")
    pub permissions: Vec<String>,
}

impl AccountSnapshot {
    /// Balance for one asset, if the account lists it.
    pub fn balance(&self, asset: &str) -> Option<&Balance> {
        self.balances.iter().find(|b| b.asset == asset)
    }

    /// Balances with a non-zero free or locked amount.
    pub fn non_zero_balances(&self) -> impl Iterator<Item = &Balance> {
        self.balances.iter().filter(|b| !b.total().is_zero())
    }
}

/// Holdings of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Asset symbol (e.g. "BTC")
    pub asset: String,
    /// Available amount
    pub free: Decimal,
    /// Amount locked in open orders
    pub locked: Decimal,
}

impl Balance {
    /// Free plus locked.
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}
