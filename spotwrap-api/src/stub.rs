//! Stub client for testing.
//!
//! Serves seeded data from memory and records what the facade sends.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use spotwrap_domain::{
    AccountSnapshot, Kline, KlineQuery, Order, OrderAck, OrderSide, OrderStatus, SymbolInfo,
    Ticker,
};

use crate::error::ClientError;
use crate::ports::SpotClient;

/// A market order the stub received.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// Trading pair
    pub symbol: String,
    /// Quantity as sent by the facade
    pub quantity: f64,
    /// Side
    pub side: OrderSide,
}

/// In-memory [`SpotClient`].
#[derive(Default)]
pub struct StubSpotClient {
    tickers: RwLock<Vec<Ticker>>,
    account: RwLock<AccountSnapshot>,
    symbols: RwLock<HashMap<String, SymbolInfo>>,
    klines: RwLock<Vec<Kline>>,
    orders: RwLock<HashMap<String, Vec<Order>>>,
    placed: Mutex<Vec<PlacedOrder>>,
    kline_queries: Mutex<Vec<KlineQuery>>,
    fail_next: Mutex<Option<ClientError>>,
    order_counter: Mutex<u64>,
}

impl StubSpotClient {
    /// Create an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ticker list.
    pub fn set_tickers(&self, tickers: Vec<Ticker>) {
        *self.tickers.write().unwrap() = tickers;
    }

    /// Seed the account snapshot.
    pub fn set_account(&self, account: AccountSnapshot) {
        *self.account.write().unwrap() = account;
    }

    /// Register trading rules for a symbol.
    pub fn add_symbol(&self, info: SymbolInfo) {
        self.symbols.write().unwrap().insert(info.symbol.clone(), info);
    }

    /// Seed the klines returned for every query.
    pub fn set_klines(&self, klines: Vec<Kline>) {
        *self.klines.write().unwrap() = klines;
    }

    /// Seed the order history of a symbol.
    pub fn set_orders(&self, symbol: &str, orders: Vec<Order>) {
        self.orders.write().unwrap().insert(symbol.to_string(), orders);
    }

    /// Make the next call, whatever it is, fail with `error`.
    pub fn fail_next(&self, error: ClientError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// Market orders received so far.
    pub fn placed_orders(&self) -> Vec<PlacedOrder> {
        self.placed.lock().unwrap().clone()
    }

    /// Kline queries received so far.
    pub fn kline_queries(&self) -> Vec<KlineQuery> {
        self.kline_queries.lock().unwrap().clone()
    }

    /// Take the pending failure, if any.
    fn check_failure(&self) -> Result<(), ClientError> {
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_order_id(&self) -> u64 {
        let mut counter = self.order_counter.lock().unwrap();
        *counter += 1;
        *counter
    }
}

#[async_trait]
impl SpotClient for StubSpotClient {
    async fn list_all_tickers(&self) -> Result<Vec<Ticker>, ClientError> {
        self.check_failure()?;
        Ok(self.tickers.read().unwrap().clone())
    }

    async fn get_account_snapshot(&self) -> Result<AccountSnapshot, ClientError> {
        self.check_failure()?;
        Ok(self.account.read().unwrap().clone())
    }

    async fn get_symbol_trading_rules(
        &self,
        symbol: &str,
    ) -> Result<Option<SymbolInfo>, ClientError> {
        self.check_failure()?;
        Ok(self.symbols.read().unwrap().get(symbol).cloned())
    }

    async fn place_market_order(
        &self,
        symbol: &str,
        quantity: f64,
        side: OrderSide,
    ) -> Result<OrderAck, ClientError> {
        self.check_failure()?;

        self.placed.lock().unwrap().push(PlacedOrder {
            symbol: symbol.to_string(),
            quantity,
            side,
        });

        let order_id = self.next_order_id();
        tracing::debug!(order_id, %symbol, %side, "Stub: market order accepted");

        Ok(OrderAck {
            symbol: symbol.to_string(),
            order_id,
            client_order_id: format!("STUB-{}", order_id),
            transact_time: 0,
            orig_qty: Default::default(),
            executed_qty: Default::default(),
            cummulative_quote_qty: Default::default(),
            status: OrderStatus::New,
            fills: Vec::new(),
        })
    }

    async fn get_historical_klines(&self, query: &KlineQuery) -> Result<Vec<Kline>, ClientError> {
        self.check_failure()?;
        self.kline_queries.lock().unwrap().push(query.clone());
        Ok(self.klines.read().unwrap().clone())
    }

    async fn get_all_orders(&self, symbol: &str) -> Result<Vec<Order>, ClientError> {
        self.check_failure()?;
        Ok(self.orders.read().unwrap().get(symbol).cloned().unwrap_or_default())
    }
}

// =============================================================================
// Tests
// =============================================================================
