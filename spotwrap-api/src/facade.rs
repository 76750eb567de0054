//! Fail-soft spot facade.
//!
//! Every operation comes in two forms:
//!
//! - `try_<op>` returns a [`SpotApiResult`] and leaves error handling to
//!   the caller.
//! - `<op>` logs one warning on failure and returns a fixed default
//!   (empty collection, `None`, or [`DEFAULT_STEP_SIZE`]).
//!
//! With the fail-soft forms, "no data" and "call failed" look the same to
//! the caller; use the `try_*` forms where that matters.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};

use spotwrap_domain::{
    AccountSnapshot, Balance, Kline, KlineQuery, Order, OrderAck, OrderSide, QuantityInput,
    Ticker,
};

use crate::error::{SpotApiError, SpotApiResult};
use crate::ports::SpotClient;

/// Step size returned when a symbol's LOT_SIZE filter cannot be read.
pub const DEFAULT_STEP_SIZE: Decimal = dec!(0.001);

/// Facade over an authenticated [`SpotClient`].
///
/// Holds a shared handle to the client and nothing else; cloning the
/// facade clones the handle.
pub struct SpotApi<C: SpotClient> {
    client: Arc<C>,
}

impl<C: SpotClient> Clone for SpotApi<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: SpotClient> SpotApi<C> {
    /// Wrap an already-authenticated client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    // =========================================================================
    // Market Data
    // =========================================================================

    /// Latest price for every symbol.
    pub async fn try_list_all_tickers(&self) -> SpotApiResult<Vec<Ticker>> {
        Ok(self.client.list_all_tickers().await?)
    }

    /// Latest price for every symbol, or an empty list on failure.
    pub async fn list_all_tickers(&self) -> Vec<Ticker> {
        self.try_list_all_tickers()
            .await
            .unwrap_or_else(|e| fail_soft("list_all_tickers", &e))
    }

    /// Candles for `query`, which is forwarded unchanged.
    pub async fn try_get_historical_klines(&self, query: &KlineQuery) -> SpotApiResult<Vec<Kline>> {
        Ok(self.client.get_historical_klines(query).await?)
    }

    /// Candles for `query`, or an empty list on failure.
    pub async fn get_historical_klines(&self, query: &KlineQuery) -> Vec<Kline> {
        self.try_get_historical_klines(query)
            .await
            .unwrap_or_else(|e| fail_soft("get_historical_klines", &e))
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Current account snapshot.
    pub async fn try_get_account(&self) -> SpotApiResult<AccountSnapshot> {
        Ok(self.client.get_account_snapshot().await?)
    }

    /// Current account snapshot, or the empty snapshot on failure.
    pub async fn get_account(&self) -> AccountSnapshot {
        self.try_get_account()
            .await
            .unwrap_or_else(|e| fail_soft("get_account", &e))
    }

    /// Per-asset balances from the account snapshot.
    pub async fn try_get_balances(&self) -> SpotApiResult<Vec<Balance>> {
        Ok(self.client.get_account_snapshot().await?.balances)
    }

    /// Per-asset balances, or `None` on failure.
    pub async fn get_balances(&self) -> Option<Vec<Balance>> {
        match self.try_get_balances().await {
            Ok(balances) => Some(balances),
            Err(e) => {
                warn!(
                    operation = "get_balances",
                    error = %e,
                    "Could not get account balance: {}", e
                );
                None
            },
        }
    }

    /// Order history for `symbol`.
    pub async fn try_get_all_orders(&self, symbol: &str) -> SpotApiResult<Vec<Order>> {
        Ok(self.client.get_all_orders(symbol).await?)
    }

    /// Order history for `symbol`, or an empty list on failure.
    pub async fn get_all_orders(&self, symbol: &str) -> Vec<Order> {
        self.try_get_all_orders(symbol)
            .await
            .unwrap_or_else(|e| fail_soft("get_all_orders", &e))
    }

    // =========================================================================
    // Trading Rules
    // =========================================================================

    /// Normalized LOT_SIZE step size for `symbol`.
    ///
    /// # Errors
    /// - `SymbolNotFound` if the exchange has no rules for the symbol
    /// - `LotSizeMissing` if the rules carry no LOT_SIZE filter
    pub async fn try_get_step_size(&self, symbol: &str) -> SpotApiResult<Decimal> {
        let info = self
            .client
            .get_symbol_trading_rules(symbol)
            .await?
            .ok_or_else(|| SpotApiError::SymbolNotFound(symbol.to_string()))?;

        info.lot_size()
            .map(|lot| lot.step_size.normalize())
            .ok_or_else(|| SpotApiError::LotSizeMissing(symbol.to_string()))
    }

    /// Normalized LOT_SIZE step size for `symbol`, or [`DEFAULT_STEP_SIZE`].
    pub async fn get_step_size(&self, symbol: &str) -> Decimal {
        match self.try_get_step_size(symbol).await {
            Ok(step) => step,
            Err(e) => {
                warn!(
                    operation = "get_step_size",
                    %symbol,
                    error = %e,
                    "Could not get step size for {}: {}. Defaulting to {}", symbol, e, DEFAULT_STEP_SIZE
                );
                DEFAULT_STEP_SIZE
            },
        }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place a market buy. `quantity` is coerced to `f64` first.
    pub async fn try_order_market_buy<Q: QuantityInput>(
        &self,
        symbol: &str,
        quantity: Q,
    ) -> SpotApiResult<OrderAck> {
        let quantity = quantity.to_quantity()?;
        self.place_market_order(symbol, quantity, OrderSide::Buy).await
    }

    /// Place a market buy; failures are logged and dropped.
    pub async fn order_market_buy<Q: QuantityInput>(&self, symbol: &str, quantity: Q) {
        if let Err(e) = self.try_order_market_buy(symbol, quantity).await {
            log_failure("order_market_buy", &e);
        }
    }

    /// Place a market sell. `quantity` is coerced to `f64` first.
    pub async fn try_order_market_sell<Q: QuantityInput>(
        &self,
        symbol: &str,
        quantity: Q,
    ) -> SpotApiResult<OrderAck> {
        let quantity = quantity.to_quantity()?;
        self.place_market_order(symbol, quantity, OrderSide::Sell).await
    }

    /// Place a market sell; failures are logged and dropped.
    pub async fn order_market_sell<Q: QuantityInput>(&self, symbol: &str, quantity: Q) {
        if let Err(e) = self.try_order_market_sell(symbol, quantity).await {
            log_failure("order_market_sell", &e);
        }
    }

    async fn place_market_order(
        &self,
        symbol: &str,
        quantity: f64,
        side: OrderSide,
    ) -> SpotApiResult<OrderAck> {
        info!(%symbol, quantity, %side, "MARKET {} {:?} {}", side, quantity, symbol);
        Ok(self.client.place_market_order(symbol, quantity, side).await?)
    }
}

fn log_failure(operation: &'static str, error: &SpotApiError) {
    warn!(operation, error = %error, "`{}()` failed: {}", operation, error);
}

fn fail_soft<T: Default>(operation: &'static str, error: &SpotApiError) -> T {
    log_failure(operation, error);
    T::default()
}
