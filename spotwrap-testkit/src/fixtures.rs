//! Fixtures shaped like Binance Spot REST responses.
//!
//! The `*_json` builders return raw payloads for HTTP test doubles; the
//! typed helpers parse those same payloads so both test layers agree on
//! the wire shape.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use spotwrap_domain::{AccountSnapshot, Kline, Order, SymbolInfo, Ticker};

/// `GET /api/v3/ticker/price` body.
pub fn tickers_json() -> Value {
    json!([
        {"symbol": "ETHBTC", "price": "0.05120000"},
        {"symbol": "BTCUSDT", "price": "95000.01000000"}
    ])
}

/// Exchange info entry for `symbol` with a LOT_SIZE filter of `step_size`.
pub fn symbol_info_json(symbol: &str, step_size: &str) -> Value {
    json!({
        "symbol": symbol,
        "status": "TRADING",
        "baseAsset": "ETH",
        "quoteAsset": "BTC",
        "filters": [
            {"filterType": "PRICE_FILTER", "minPrice": "0.00001000", "maxPrice": "922327.00000000", "tickSize": "0.00001000"},
            {"filterType": "LOT_SIZE", "minQty": step_size, "maxQty": "100000.00000000", "stepSize": step_size},
            {"filterType": "MAX_NUM_ORDERS", "maxNumOrders": 200}
        ]
    })
}

/// Exchange info entry for `symbol` with no LOT_SIZE filter.
pub fn symbol_info_without_lot_size_json(symbol: &str) -> Value {
    json!({
        "symbol": symbol,
        "status": "TRADING",
        "baseAsset": "ETH",
        "quoteAsset": "BTC",
        "filters": [
            {"filterType": "PRICE_FILTER", "minPrice": "0.00001000", "maxPrice": "922327.00000000", "tickSize": "0.00001000"}
        ]
    })
}

/// `GET /api/v3/exchangeInfo` body wrapping `symbols`.
pub fn exchange_info_json(symbols: Vec<Value>) -> Value {
    json!({
        "timezone": "UTC",
        "serverTime": 1_700_000_000_000_i64,
        "rateLimits": [],
        "exchangeFilters": [],
        "symbols": symbols
    })
}

/// `GET /api/v3/account` body with one BTC and one USDT balance.
pub fn account_json() -> Value {
    json!({
        "makerCommission": 10,
        "takerCommission": 10,
        "buyerCommission": 0,
        "sellerCommission": 0,
        "canTrade": true,
        "canWithdraw": true,
        "canDeposit": true,
        "updateTime": 1_700_000_000_000_i64,
        "accountType": "SPOT",
        "balances": [
            {"asset": "BTC", "free": "0.50000000", "locked": "0.10000000"},
            {"asset": "USDT", "free": "1000.00000000", "locked": "0.00000000"}
        ],
        "permissions": ["SPOT"]
    })
}

/// One kline row (positional array) opening at `open_time_ms`.
pub fn kline_row(open_time_ms: i64, interval_ms: i64, close: &str) -> Value {
    json!([
        open_time_ms,
        "100.00000000",
        "110.00000000",
        "90.00000000",
        close,
        "12.50000000",
        open_time_ms + interval_ms - 1,
        "1250.00000000",
        42,
        "6.00000000",
        "600.00000000",
        "0"
    ])
}

/// One `GET /api/v3/allOrders` row.
pub fn order_json(symbol: &str, order_id: u64, status: &str) -> Value {
    json!({
        "symbol": symbol,
        "orderId": order_id,
        "orderListId": -1,
        "clientOrderId": format!("client-{}", order_id),
        "price": "0.00000000",
        "origQty": "1.00000000",
        "executedQty": "1.00000000",
        "cummulativeQuoteQty": "95000.00000000",
        "status": status,
        "timeInForce": "GTC",
        "type": "MARKET",
        "side": "BUY",
        "time": 1_700_000_000_000_i64,
        "updateTime": 1_700_000_000_000_i64,
        "isWorking": true
    })
}

/// `POST /api/v3/order` FULL response for a filled market order.
pub fn order_ack_json(symbol: &str, side: &str, quantity: &str, client_order_id: &str) -> Value {
    json!({
        "symbol": symbol,
        "orderId": 28,
        "orderListId": -1,
        "clientOrderId": client_order_id,
        "transactTime": 1_700_000_000_000_i64,
        "price": "0.00000000",
        "origQty": quantity,
        "executedQty": quantity,
        "cummulativeQuoteQty": "95.00000000",
        "status": "FILLED",
        "timeInForce": "GTC",
        "type": "MARKET",
        "side": side,
        "fills": [
            {"price": "95000.00000000", "qty": quantity, "commission": "0.00000100", "commissionAsset": "BTC", "tradeId": 56}
        ]
    })
}

/// Binance error body.
pub fn error_json(code: i64, msg: &str) -> Value {
    json!({"code": code, "msg": msg})
}

// =============================================================================
// Typed helpers
// =============================================================================

/// Parsed [`tickers_json`].
pub fn tickers() -> Vec<Ticker> {
    parse(tickers_json())
}

/// Parsed [`symbol_info_json`].
pub fn symbol_info(symbol: &str, step_size: &str) -> SymbolInfo {
    parse(symbol_info_json(symbol, step_size))
}

/// Parsed [`symbol_info_without_lot_size_json`].
pub fn symbol_info_without_lot_size(symbol: &str) -> SymbolInfo {
    parse(symbol_info_without_lot_size_json(symbol))
}

/// Parsed [`account_json`].
pub fn account() -> AccountSnapshot {
    parse(account_json())
}

/// Parsed [`order_json`].
pub fn order(symbol: &str, order_id: u64, status: &str) -> Order {
    parse(order_json(symbol, order_id, status))
}

/// A kline with only the open time and close price varying.
pub fn kline(open_time: DateTime<Utc>, close: &str) -> Kline {
    Kline {
        open_time,
        open: "100".parse().expect("valid decimal"),
        high: "110".parse().expect("valid decimal"),
        low: "90".parse().expect("valid decimal"),
        close: close.parse().expect("valid close price"),
        volume: "12.5".parse().expect("valid decimal"),
        close_time: open_time + chrono::Duration::minutes(1) - chrono::Duration::milliseconds(1),
        quote_volume: "1250".parse().expect("valid decimal"),
        trades: 42,
        taker_buy_base_volume: "6".parse().expect("valid decimal"),
        taker_buy_quote_volume: "600".parse().expect("valid decimal"),
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture matches domain type")
}
