//! Client port definition.
//!
//! The facade talks to the exchange only through [`SpotClient`].
//! Implementations:
//! - `StubSpotClient` - in-memory, for tests
//! - `BinanceSpotClient` (spotwrap-connectors) - Binance Spot REST API

use async_trait::async_trait;

use spotwrap_domain::{
    AccountSnapshot, Kline, KlineQuery, Order, OrderAck, OrderSide, SymbolInfo, Ticker,
};

use crate::error::ClientError;

/// An authenticated spot exchange client.
///
/// Constructed and authenticated outside this crate; the facade only
/// borrows it through an `Arc`.
#[async_trait]
pub trait SpotClient: Send + Sync {
    /// Latest price for every symbol.
    async fn list_all_tickers(&self) -> Result<Vec<Ticker>, ClientError>;

    /// Current account state, including balances.
    async fn get_account_snapshot(&self) -> Result<AccountSnapshot, ClientError>;

    /// Trading rules for `symbol`.
    ///
    /// Returns `Ok(None)` when the exchange does not know the symbol.
    async fn get_symbol_trading_rules(
        &self,
        symbol: &str,
    ) -> Result<Option<SymbolInfo>, ClientError>;

    /// Place a market order for `quantity` units of the base asset.
    async fn place_market_order(
        &self,
        symbol: &str,
        quantity: f64,
        side: OrderSide,
    ) -> Result<OrderAck, ClientError>;

    /// Candles matching `query`.
    async fn get_historical_klines(&self, query: &KlineQuery) -> Result<Vec<Kline>, ClientError>;

    /// Full order history for `symbol`.
    async fn get_all_orders(&self, symbol: &str) -> Result<Vec<Order>, ClientError>;
}
