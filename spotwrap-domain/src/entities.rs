//! Order entities for the spot account.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OrderSide;

// =============================================================================
// Order Status / Type
// =============================================================================

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted by the engine
    New,
    /// Partially filled
    PartiallyFilled,
    /// Completely filled
    Filled,
    /// Canceled by the user
    Canceled,
    /// Cancel in progress
    PendingCancel,
    /// Rejected by the engine
    Rejected,
    /// Expired (time in force or self-trade prevention)
    Expired,
    /// Expired inside the matching engine
    ExpiredInMatch,
    /// Status not known to this crate
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Whether the order can still change.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OrderStatus::New | OrderStatus::PartiallyFilled | OrderStatus::PendingCancel
        )
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
    /// Type not known to this crate
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Order
// =============================================================================

/// One order from the account's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Trading pair
    pub symbol: String,
    /// Exchange order ID
    pub order_id: u64,
    /// OCO list ID (-1 when not part of a list)
    #[serde(default = "no_order_list")]
    pub order_list_id: i64,
    /// Client order ID
    pub client_order_id: String,
    /// Limit price (zero for market orders)
    pub price: Decimal,
    /// Requested quantity
    pub orig_qty: Decimal,
    /// Filled quantity
    pub executed_qty: Decimal,
    /// Quote quantity filled so far
    pub cummulative_quote_qty: Decimal,
    /// Current status
    pub status: OrderStatus,
    /// Time in force (e.g. "GTC")
    #[serde(default)]
    pub time_in_force: String,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Side
    pub side: OrderSide,
    /// Creation time (ms since epoch)
    pub time: i64,
    /// Last update (ms since epoch)
    pub update_time: i64,
    /// Whether the order is on the book
    #[serde(default)]
    pub is_working: bool,
}

fn no_order_list() -> i64 {
    -1
}

// =============================================================================
// Order Acknowledgement
// =============================================================================

/// Exchange response to a newly placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    /// Trading pair
    pub symbol: String,
    /// Exchange order ID
    pub order_id: u64,
    /// Client order ID
    pub client_order_id: String,
    /// Transaction time (ms since epoch)
    pub transact_time: i64,
    /// Requested quantity
    #[serde(default)]
    pub orig_qty: Decimal,
    /// Filled quantity
    #[serde(default)]
    pub executed_qty: Decimal,
    /// Quote quantity filled
    #[serde(default)]
    pub cummulative_quote_qty: Decimal,
    /// Status at acknowledgement
    #[serde(default = "unknown_status")]
    pub status: OrderStatus,
    /// Fills (present for FULL responses)
    #[serde(default)]
    pub fills: Vec<Fill>,
}

fn unknown_status() -> OrderStatus {
    OrderStatus::Unknown
}

impl OrderAck {
    /// Volume-weighted average fill price, if anything filled.
    pub fn average_price(&self) -> Option<Decimal> {
        if self.executed_qty.is_zero() {
            return None;
        }
        Some(self.cummulative_quote_qty / self.executed_qty)
    }
}

/// One fill of a market order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Fill price
    pub price: Decimal,
    /// Fill quantity
    pub qty: Decimal,
    /// Commission paid
    pub commission: Decimal,
    /// Commission asset
    pub commission_asset: String,
    /// Trade ID
    #[serde(default)]
    pub trade_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_history_row() {
        let json = r#"{
            "symbol": "LTCBTC",
            "orderId": 1,
            "orderListId": -1,
            "clientOrderId": "myOrder1",
            "price": "0.1",
            "origQty": "1.0",
            "executedQty": "0.0",
            "cummulativeQuoteQty": "0.0",
            "status": "NEW",
            "timeInForce": "GTC",
            "type": "LIMIT",
            "side": "BUY",
            "stopPrice": "0.0",
            "icebergQty": "0.0",
            "time": 1499827319559,
            "updateTime": 1499827319559,
            "isWorking": true,
            "origQuoteOrderQty": "0.000000"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();

        assert_eq!(order.order_id, 1);
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.side, OrderSide::Buy);
        assert!(order.status.is_open());
        assert_eq!(order.price, dec!(0.1));
    }

    #[test]
    fn test_unknown_enum_values_do_not_fail() {
        let status: OrderStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        let order_type: OrderType = serde_json::from_str("\"TRAILING\"").unwrap();

        assert_eq!(status, OrderStatus::Unknown);
        assert_eq!(order_type, OrderType::Unknown);
    }

    #[test]
    fn test_market_order_ack_with_fills() {
        let json = r#"{
            "symbol": "BTCUSDT",
            "orderId": 28,
            "orderListId": -1,
            "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
            "transactTime": 1507725176595,
            "price": "0.00000000",
            "origQty": "2.00000000",
            "executedQty": "2.00000000",
            "cummulativeQuoteQty": "8000.00000000",
            "status": "FILLED",
            "timeInForce": "GTC",
            "type": "MARKET",
            "side": "SELL",
            "fills": [
                {"price": "4000.00000000", "qty": "1.00000000", "commission": "4.00000000", "commissionAsset": "USDT", "tradeId": 56},
                {"price": "4000.00000000", "qty": "1.00000000", "commission": "4.00000000", "commissionAsset": "USDT", "tradeId": 57}
            ]
        }"#;

        let ack: OrderAck = serde_json::from_str(json).unwrap();

        assert_eq!(ack.status, OrderStatus::Filled);
        assert_eq!(ack.fills.len(), 2);
        assert_eq!(ack.average_price(), Some(dec!(4000)));
    }

    #[test]
    fn test_ack_response_type_without_fills() {
        let ack: OrderAck = serde_json::from_str(
            r#"{"symbol": "BTCUSDT", "orderId": 1, "clientOrderId": "x", "transactTime": 1}"#,
        )
        .unwrap();

        assert_eq!(ack.status, OrderStatus::Unknown);
        assert!(ack.fills.is_empty());
        assert_eq!(ack.average_price(), None);
    }
}
