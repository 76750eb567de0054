//! Binance REST API Client for Spot Trading
//!
//! Provides REST API integration for:
//! - Ticker prices and historical klines (public)
//! - Exchange info / symbol trading rules (public)
//! - Account snapshot and order history (signed)
//! - Market orders (signed)
//!
//! # Authentication
//!
//! Binance uses API key + secret with HMAC SHA256 signatures.
//! All signed requests require:
//! - `X-MBX-APIKEY` header
//! - `signature` query parameter (HMAC SHA256 of query string)
//! - `timestamp` query parameter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;
use uuid::Uuid;

use spotwrap_api::{ClientError, SpotClient};
use spotwrap_domain::{
    AccountSnapshot, ApiCredentials, Kline, KlineInterval, KlineQuery, Order, OrderAck, OrderSide,
    SymbolInfo, Ticker,
};

use crate::config::BinanceConfig;

// =============================================================================
// Constants
// =============================================================================

/// Most klines Binance returns per request
pub const MAX_KLINES_PER_REQUEST: u16 = 1000;

/// Binance error code for an unknown symbol
const INVALID_SYMBOL_CODE: i64 = -1121;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur in the Binance REST client.
#[derive(Debug, Clone, Error)]
pub enum BinanceRestError {
    /// Failed to build request signature
    #[error("Failed to build signature: {0}")]
    SignatureError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// API returned error
    #[error("Binance API error: {code} - {msg}")]
    ApiError { code: i64, msg: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<BinanceRestError> for ClientError {
    fn from(err: BinanceRestError) -> Self {
        match err {
            BinanceRestError::SignatureError(msg) => ClientError::Signature(msg),
            BinanceRestError::RequestFailed(msg) => ClientError::Request(msg),
            BinanceRestError::ApiError { code, msg } => ClientError::Api { code, msg },
            BinanceRestError::ParseError(msg) => ClientError::Parse(msg),
            BinanceRestError::Timeout => ClientError::Timeout,
            BinanceRestError::InvalidParameter(msg) => ClientError::InvalidParameter(msg),
        }
    }
}

// =============================================================================
// Binance REST Client
// =============================================================================

/// Binance REST API client for spot trading.
pub struct BinanceSpotClient {
    /// HTTP client
    client: Client,
    /// API key pair
    credentials: ApiCredentials,
    /// REST base URL
    base_url: String,
    /// Per-request timeout
    timeout: Duration,
    /// `recvWindow` for signed requests
    recv_window_ms: Option<u64>,
}

impl BinanceSpotClient {
    /// Create a mainnet client with default settings.
    pub fn new(credentials: ApiCredentials) -> Self {
        Self::from_config(BinanceConfig::new(credentials))
    }

    /// Create a client for testnet (for testing).
    pub fn testnet(credentials: ApiCredentials) -> Self {
        Self::from_config(BinanceConfig::testnet(credentials))
    }

    /// Create a client from a loaded configuration.
    pub fn from_config(config: BinanceConfig) -> Self {
        Self {
            client: Client::new(),
            credentials: config.credentials,
            base_url: config.base_url,
            timeout: config.timeout,
            recv_window_ms: config.recv_window_ms,
        }
    }

    /// Get the base URL for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// HMAC SHA256 of `payload` with the API secret, hex encoded.
    fn sign(&self, payload: &str) -> Result<String, BinanceRestError> {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        type HmacSha256 = Hmac<Sha256>;

        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| BinanceRestError::SignatureError(format!("HMAC error: {}", e)))?;

        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Build query string with signature for signed requests.
    ///
    /// Adds `timestamp` (and `recvWindow` when configured), sorts the
    /// parameters, then appends the signature of the resulting string.
    fn build_signed_query(
        &self,
        mut params: Vec<(&str, String)>,
        timestamp_ms: i64,
    ) -> Result<String, BinanceRestError> {
        params.push(("timestamp", timestamp_ms.to_string()));
        if let Some(window) = self.recv_window_ms {
            params.push(("recvWindow", window.to_string()));
        }

        params.sort_by(|a, b| a.0.cmp(b.0));

        let query_string = encode_params(&params)?;
        let signature = self.sign(&query_string)?;

        Ok(format!("{}&signature={}", query_string, signature))
    }

    /// Send a request and return the body of a successful response.
    ///
    /// The timeout covers both the response head and the body.
    async fn send(&self, request: RequestBuilder) -> Result<String, BinanceRestError> {
        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| BinanceRestError::RequestFailed(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| BinanceRestError::ParseError(e.to_string()))?;
            Ok::<_, BinanceRestError>((status, body))
        };

        let (status, body) = timeout(self.timeout, exchange)
            .await
            .map_err(|_| BinanceRestError::Timeout)??;

        if !status.is_success() {
            // Try to parse Binance error response
            if let Ok(err) = serde_json::from_str::<BinanceErrorResponse>(&body) {
                return Err(BinanceRestError::ApiError { code: err.code, msg: err.msg });
            }
            return Err(BinanceRestError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        Ok(body)
    }

    /// Send a GET request to a public endpoint.
    async fn get_public(&self, endpoint: &str, params: Vec<(&str, String)>) -> Result<String, BinanceRestError> {
        let url = if params.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, encode_params(&params)?)
        };

        debug!(%url, "Binance public GET");
        self.send(self.client.get(&url)).await
    }

    /// Send a GET request to a signed endpoint.
    async fn get_signed(&self, endpoint: &str, params: Vec<(&str, String)>) -> Result<String, BinanceRestError> {
        let query = self.build_signed_query(params, Utc::now().timestamp_millis())?;
        let url = format!("{}{}?{}", self.base_url, endpoint, query);

        debug!(%endpoint, "Binance signed GET");
        self.send(self.client.get(&url).header("X-MBX-APIKEY", &self.credentials.api_key))
            .await
    }

    /// Send a POST request to a signed endpoint.
    async fn post_signed(&self, endpoint: &str, params: Vec<(&str, String)>) -> Result<String, BinanceRestError> {
        let query = self.build_signed_query(params, Utc::now().timestamp_millis())?;
        let url = format!("{}{}?{}", self.base_url, endpoint, query);

        debug!(%endpoint, "Binance signed POST");
        self.send(self.client.post(&url).header("X-MBX-APIKEY", &self.credentials.api_key))
            .await
    }

    // =========================================================================
    // Market Data API
    // =========================================================================

    /// Latest price for every symbol.
    ///
    /// # Endpoint
    ///
    /// `GET /api/v3/ticker/price`
    pub async fn get_ticker_prices(&self) -> Result<Vec<Ticker>, BinanceRestError> {
        let body = self.get_public("/api/v3/ticker/price", vec![]).await?;
        parse_json(&body)
    }

    /// Trading rules for one symbol, `None` if Binance does not list it.
    ///
    /// # Endpoint
    ///
    /// `GET /api/v3/exchangeInfo?symbol=`
    pub async fn get_symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>, BinanceRestError> {
        let params = vec![("symbol", symbol.to_string())];

        let body = match self.get_public("/api/v3/exchangeInfo", params).await {
            Ok(body) => body,
            Err(BinanceRestError::ApiError { code: INVALID_SYMBOL_CODE, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let info: ExchangeInfoResponse = parse_json(&body)?;
        Ok(info.symbols.into_iter().find(|s| s.symbol == symbol))
    }

    /// One page of klines.
    ///
    /// # Endpoint
    ///
    /// `GET /api/v3/klines`
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        start_ms: Option<i64>,
        end_ms: Option<i64>,
        limit: u16,
    ) -> Result<Vec<Kline>, BinanceRestError> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(start) = start_ms {
            params.push(("startTime", start.to_string()));
        }
        if let Some(end) = end_ms {
            params.push(("endTime", end.to_string()));
        }

        let body = self.get_public("/api/v3/klines", params).await?;
        let rows: Vec<RawKline> = parse_json(&body)?;

        rows.into_iter().map(RawKline::into_kline).collect()
    }

    /// All klines matching `query`.
    ///
    /// With a start time, pages forward `limit` rows at a time (at most
    /// [`MAX_KLINES_PER_REQUEST`]) until a short page, the end time, or a
    /// page that does not advance. Without a start time, makes one request
    /// for the most recent candles.
    pub async fn get_historical_klines(&self, query: &KlineQuery) -> Result<Vec<Kline>, BinanceRestError> {
        let page_limit = query.limit.unwrap_or(MAX_KLINES_PER_REQUEST).min(MAX_KLINES_PER_REQUEST);
        if page_limit == 0 {
            return Err(BinanceRestError::InvalidParameter("limit must be positive".to_string()));
        }

        let end_ms = query.end_time.map(|t| t.timestamp_millis());

        let Some(start) = query.start_time else {
            return self.get_klines(&query.symbol, query.interval, None, end_ms, page_limit).await;
        };

        let mut cursor = start.timestamp_millis();
        let mut klines = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .get_klines(&query.symbol, query.interval, Some(cursor), end_ms, page_limit)
                .await?;
            pages += 1;

            let fetched = page.len();
            let Some(last_open) = page.last().map(|k| k.open_time.timestamp_millis()) else {
                break;
            };
            klines.extend(page);

            if fetched < usize::from(page_limit) {
                break;
            }
            if matches!(end_ms, Some(end) if last_open >= end) {
                break;
            }

            // Month candles vary in length, so step just past the last open.
            let next = last_open + 1;
            if next <= cursor {
                break;
            }
            cursor = next;
        }

        debug!(symbol = %query.symbol, interval = %query.interval, pages, klines = klines.len(), "Fetched historical klines");
        Ok(klines)
    }

    // =========================================================================
    // Account API
    // =========================================================================

    /// Current spot account.
    ///
    /// # Endpoint
    ///
    /// `GET /api/v3/account`
    pub async fn get_account(&self) -> Result<AccountSnapshot, BinanceRestError> {
        let body = self.get_signed("/api/v3/account", vec![]).await?;
        parse_json(&body)
    }

    /// Every order (open, filled, canceled) for a symbol.
    ///
    /// # Endpoint
    ///
    /// `GET /api/v3/allOrders`
    pub async fn get_all_orders(&self, symbol: &str) -> Result<Vec<Order>, BinanceRestError> {
        let params = vec![("symbol", symbol.to_string())];

        let body = self.get_signed("/api/v3/allOrders", params).await?;
        parse_json(&body)
    }

    // =========================================================================
    // Order API
    // =========================================================================

    /// Place a spot market order.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Trading pair symbol (e.g., "BTCUSDT")
    /// * `side` - Order side (BUY or SELL)
    /// * `quantity` - Base asset quantity
    ///
    /// # Endpoint
    ///
    /// `POST /api/v3/order`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let ack = client.place_market_order("BTCUSDT", OrderSide::Sell, 0.1).await?;
    /// println!("Order ID: {}", ack.order_id);
    /// ```
    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: f64,
    ) -> Result<OrderAck, BinanceRestError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(BinanceRestError::InvalidParameter(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }

        let params = vec![
            ("symbol", symbol.to_string()),
            ("side", side.as_str().to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", quantity.to_string()),
            ("newClientOrderId", Uuid::now_v7().to_string()),
        ];

        let body = self.post_signed("/api/v3/order", params).await?;
        parse_json(&body)
    }
}

#[async_trait]
impl SpotClient for BinanceSpotClient {
    async fn list_all_tickers(&self) -> Result<Vec<Ticker>, ClientError> {
        Ok(self.get_ticker_prices().await?)
    }

    async fn get_account_snapshot(&self) -> Result<AccountSnapshot, ClientError> {
        Ok(self.get_account().await?)
    }

    async fn get_symbol_trading_rules(
        &self,
        symbol: &str,
    ) -> Result<Option<SymbolInfo>, ClientError> {
        Ok(self.get_symbol_info(symbol).await?)
    }

    async fn place_market_order(
        &self,
        symbol: &str,
        quantity: f64,
        side: OrderSide,
    ) -> Result<OrderAck, ClientError> {
        Ok(BinanceSpotClient::place_market_order(self, symbol, side, quantity).await?)
    }

    async fn get_historical_klines(&self, query: &KlineQuery) -> Result<Vec<Kline>, ClientError> {
        Ok(BinanceSpotClient::get_historical_klines(self, query).await?)
    }

    async fn get_all_orders(&self, symbol: &str) -> Result<Vec<Order>, ClientError> {
        Ok(BinanceSpotClient::get_all_orders(self, symbol).await?)
    }
}

/// Form-encode `params` in order, as reqwest's `RequestBuilder::query` does.
fn encode_params(params: &[(&str, String)]) -> Result<String, BinanceRestError> {
    serde_urlencoded::to_string(params).map_err(|e| BinanceRestError::InvalidParameter(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, BinanceRestError> {
    serde_json::from_str(body).map_err(|e| BinanceRestError::ParseError(e.to_string()))
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, BinanceRestError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| BinanceRestError::ParseError(format!("Invalid timestamp: {}", ms)))
}

// =============================================================================
// Binance Types (from API responses)
// =============================================================================

/// Binance error response.
#[derive(Debug, Deserialize)]
struct BinanceErrorResponse {
    code: i64,
    msg: String,
}

/// Exchange info response (only the symbol list is used).
#[derive(Debug, Deserialize)]
struct ExchangeInfoResponse {
    symbols: Vec<SymbolInfo>,
}

/// Kline row as sent by Binance: a positional JSON array.
#[derive(Debug, Deserialize)]
struct RawKline(
    i64,        // open time
    Decimal,    // open
    Decimal,    // high
    Decimal,    // low
    Decimal,    // close
    Decimal,    // volume
    i64,        // close time
    Decimal,    // quote asset volume
    u64,        // number of trades
    Decimal,    // taker buy base volume
    Decimal,    // taker buy quote volume
    IgnoredAny, // unused
);

impl RawKline {
    fn into_kline(self) -> Result<Kline, BinanceRestError> {
        Ok(Kline {
            open_time: millis_to_datetime(self.0)?,
            open: self.1,
            high: self.2,
            low: self.3,
            close: self.4,
            volume: self.5,
            close_time: millis_to_datetime(self.6)?,
            quote_volume: self.7,
            trades: self.8,
            taker_buy_base_volume: self.9,
            taker_buy_quote_volume: self.10,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client() -> BinanceSpotClient {
        BinanceSpotClient::new(ApiCredentials::new("test_key", "test_secret"))
    }

    #[test]
    fn test_sign_matches_binance_reference_example() {
        let client = BinanceSpotClient::new(ApiCredentials::new(
            "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A",
            "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j",
        ));

        let signature = client
            .sign("symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559")
            .unwrap();

        assert_eq!(signature, "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71");
    }

    #[test]
    fn test_build_signed_query() {
        let query = client()
            .build_signed_query(vec![("symbol", "BTCUSDT".to_string())], 1_700_000_000_000)
            .unwrap();

        assert!(query.starts_with("symbol=BTCUSDT&timestamp=1700000000000&signature="));
        let signature = query.rsplit("signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn test_build_signed_query_sorts_params() {
        let params = vec![
            ("symbol", "BTCUSDT".to_string()),
            ("side", "SELL".to_string()),
        ];
        let query = client().build_signed_query(params, 1).unwrap();

        let side_idx = query.find("side=").unwrap();
        let symbol_idx = query.find("symbol=").unwrap();
        assert!(side_idx < symbol_idx);
    }

    #[test]
    fn test_build_signed_query_is_deterministic_and_includes_recv_window() {
        let mut config = BinanceConfig::new(ApiCredentials::new("k", "s"));
        config.recv_window_ms = Some(5000);
        let client = BinanceSpotClient::from_config(config);

        let first = client.build_signed_query(vec![], 42).unwrap();
        let second = client.build_signed_query(vec![], 42).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("recvWindow=5000&timestamp=42&signature="));
    }

    #[test]
    fn test_encode_params_percent_encodes_values() {
        let params = vec![
            ("symbol", "ETH&side=SELL".to_string()),
            ("note", "a b=c".to_string()),
        ];

        assert_eq!(encode_params(&params).unwrap(), "symbol=ETH%26side%3DSELL&note=a+b%3Dc");
    }

    #[test]
    fn test_signature_covers_encoded_query() {
        let client = client();
        let query = client
            .build_signed_query(vec![("symbol", "A&B".to_string())], 7)
            .unwrap();

        let (payload, signature) = query.rsplit_once("&signature=").unwrap();
        assert_eq!(payload, "symbol=A%26B&timestamp=7");
        assert_eq!(signature, client.sign(payload).unwrap());
    }

    #[test]
    fn test_raw_kline_decodes_positionally() {
        let row = r#"[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100","148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397","28.46694368","0"]"#;

        let raw: RawKline = serde_json::from_str(row).unwrap();
        let kline = raw.into_kline().unwrap();

        assert_eq!(kline.open_time.timestamp_millis(), 1499040000000);
        assert_eq!(kline.high, dec!(0.8));
        assert_eq!(kline.close, dec!(0.015771));
        assert_eq!(kline.trades, 308);
        assert_eq!(kline.close_time.timestamp_millis(), 1499644799999);
    }

    #[test]
    fn test_rest_error_maps_to_client_error() {
        assert_eq!(ClientError::from(BinanceRestError::Timeout), ClientError::Timeout);
        assert_eq!(
            ClientError::from(BinanceRestError::ApiError { code: -1121, msg: "Invalid symbol.".to_string() }),
            ClientError::Api { code: -1121, msg: "Invalid symbol.".to_string() }
        );
    }

    #[test]
    fn test_testnet_base_url() {
        let client = BinanceSpotClient::testnet(ApiCredentials::new("k", "s"));
        assert_eq!(client.base_url(), "https://testnet.binance.vision");
    }

    #[tokio::test]
    async fn test_place_market_order_rejects_non_positive_quantity() {
        let result = client().place_market_order("BTCUSDT", OrderSide::Buy, 0.0).await;
        assert!(matches!(result, Err(BinanceRestError::InvalidParameter(_))));
    }
}
