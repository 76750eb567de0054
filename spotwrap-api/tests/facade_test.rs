//! Behavioural tests for the fail-soft facade.
//!
//! Each failing client call must produce the documented default and
//! exactly one warning carrying the underlying error text.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use spotwrap_api::{ClientError, PlacedOrder, SpotApi, SpotApiError, StubSpotClient, DEFAULT_STEP_SIZE};
use spotwrap_domain::{AccountSnapshot, KlineInterval, KlineQuery, OrderSide};
use spotwrap_testkit::{fixtures, LogCapture};

fn setup() -> (Arc<StubSpotClient>, SpotApi<StubSpotClient>, LogCapture) {
    let client = Arc::new(StubSpotClient::new());
    let api = SpotApi::new(Arc::clone(&client));
    (client, api, LogCapture::new())
}

fn timeout() -> ClientError {
    ClientError::Request("timeout".to_string())
}

// =============================================================================
// Fail-soft defaults
// =============================================================================

#[tokio::test]
async fn test_get_account_timeout_returns_empty_snapshot() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.fail_next(timeout());

    let account = api.get_account().await;

    assert_eq!(account, AccountSnapshot::default());
    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("timeout"));
    assert!(warnings[0].message.contains("`get_account()` failed"));
    assert_eq!(warnings[0].field("operation"), Some("get_account"));
}

#[tokio::test]
async fn test_list_all_tickers_failure_returns_empty() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.set_tickers(fixtures::tickers());
    client.fail_next(ClientError::Api { code: -1003, msg: "Too many requests".to_string() });

    assert!(api.list_all_tickers().await.is_empty());
    assert_eq!(logs.warnings().len(), 1);
    assert!(logs.warnings()[0].message.contains("Too many requests"));
}

#[tokio::test]
async fn test_get_balances_failure_returns_none() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.fail_next(timeout());

    assert_eq!(api.get_balances().await, None);
    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.starts_with("Could not get account balance"));
    assert!(warnings[0].message.contains("timeout"));
}

#[tokio::test]
async fn test_get_historical_klines_failure_returns_empty() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.fail_next(ClientError::Parse("unexpected row".to_string()));

    let query = KlineQuery::new("BTCUSDT", KlineInterval::OneHour);
    assert!(api.get_historical_klines(&query).await.is_empty());
    assert_eq!(logs.warnings().len(), 1);
    assert!(logs.warnings()[0].message.contains("`get_historical_klines()` failed"));
}

#[tokio::test]
async fn test_get_all_orders_failure_returns_empty() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.set_orders("BTCUSDT", vec![fixtures::order("BTCUSDT", 1, "FILLED")]);
    client.fail_next(ClientError::Timeout);

    assert!(api.get_all_orders("BTCUSDT").await.is_empty());
    assert_eq!(logs.warnings().len(), 1);
    assert!(logs.warnings()[0].message.contains("Request timed out"));
}

#[tokio::test]
async fn test_market_order_failure_is_swallowed() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.fail_next(ClientError::Api { code: -2010, msg: "Account has insufficient balance".to_string() });

    api.order_market_sell("BTCUSDT", 1).await;

    assert_eq!(logs.infos().len(), 1);
    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("`order_market_sell()` failed"));
    assert!(warnings[0].message.contains("insufficient balance"));
}

#[tokio::test]
async fn test_market_buy_failure_is_swallowed() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.fail_next(ClientError::Api { code: -1013, msg: "Filter failure: LOT_SIZE".to_string() });

    api.order_market_buy("ETHBTC", "0.5").await;

    let infos = logs.infos();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].message, "MARKET BUY 0.5 ETHBTC");
    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("`order_market_buy()` failed"));
    assert!(warnings[0].message.contains("LOT_SIZE"));
    assert_eq!(warnings[0].field("operation"), Some("order_market_buy"));
}

// =============================================================================
// Successful forwarding
// =============================================================================

#[tokio::test]
async fn test_successful_calls_do_not_warn() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.set_tickers(fixtures::tickers());
    client.set_account(fixtures::account());
    client.set_orders("BTCUSDT", vec![fixtures::order("BTCUSDT", 9, "NEW")]);

    assert_eq!(api.list_all_tickers().await.len(), 2);
    assert_eq!(api.get_account().await.account_type, "SPOT");
    assert_eq!(api.get_balances().await.map(|b| b.len()), Some(2));
    assert_eq!(api.get_all_orders("BTCUSDT").await[0].order_id, 9);

    assert!(logs.warnings().is_empty());
}

#[tokio::test]
async fn test_get_historical_klines_forwards_query_unchanged() {
    let (client, api, _logs) = setup();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let klines = vec![
        fixtures::kline(start, "101.5"),
        fixtures::kline(start + chrono::Duration::minutes(1), "102"),
    ];
    client.set_klines(klines.clone());

    let query = KlineQuery::new("ETHBTC", KlineInterval::OneMinute)
        .with_start(start)
        .with_end(start + chrono::Duration::hours(1))
        .with_limit(500);

    let result = api.get_historical_klines(&query).await;

    assert_eq!(result, klines);
    assert_eq!(client.kline_queries(), vec![query]);
}

// =============================================================================
// Step size
// =============================================================================

#[tokio::test]
async fn test_step_size_is_normalized() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.add_symbol(fixtures::symbol_info("ETHBTC", "0.00100000"));

    let step = api.get_step_size("ETHBTC").await;

    assert_eq!(step, dec!(0.001));
    assert_eq!(step.to_string(), "0.001");
    assert!(logs.warnings().is_empty());
}

#[tokio::test]
async fn test_step_size_keeps_significant_digits() {
    let (client, api, _logs) = setup();
    client.add_symbol(fixtures::symbol_info("BTCUSDT", "0.00001000"));

    assert_eq!(api.get_step_size("BTCUSDT").await.to_string(), "0.00001");
}

#[tokio::test]
async fn test_step_size_defaults_when_client_fails() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.add_symbol(fixtures::symbol_info("ETHBTC", "0.01000000"));
    client.fail_next(timeout());

    assert_eq!(api.get_step_size("ETHBTC").await, DEFAULT_STEP_SIZE);
    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("Could not get step size for ETHBTC"));
    assert!(warnings[0].message.contains("timeout"));
    assert!(warnings[0].message.contains("Defaulting to 0.001"));
}

#[tokio::test]
async fn test_step_size_defaults_for_unknown_symbol() {
    let (_client, api, logs) = setup();
    let _guard = logs.install();

    assert_eq!(api.get_step_size("NOPE").await, dec!(0.001));
    assert_eq!(logs.warnings().len(), 1);
}

#[tokio::test]
async fn test_step_size_defaults_without_lot_size_filter() {
    let (client, api, logs) = setup();
    let _guard = logs.install();
    client.add_symbol(fixtures::symbol_info_without_lot_size("ETHBTC"));

    assert_eq!(api.get_step_size("ETHBTC").await, dec!(0.001));
    assert_eq!(logs.warnings().len(), 1);
}

// =============================================================================
// Market orders
// =============================================================================

#[tokio::test]
async fn test_market_buy_coerces_quantity_to_float() {
    let (client, api, _logs) = setup();

    api.order_market_buy("ETHBTC", 2).await;
    api.order_market_buy("ETHBTC", "0.5").await;
    api.order_market_buy("ETHBTC", String::from("3")).await;
    api.order_market_buy("ETHBTC", dec!(0.125)).await;
    api.order_market_buy("ETHBTC", 0.75_f64).await;

    let quantities: Vec<f64> = client.placed_orders().iter().map(|o| o.quantity).collect();
    assert_eq!(quantities, vec![2.0, 0.5, 3.0, 0.125, 0.75]);
    assert!(client.placed_orders().iter().all(|o| o.side == OrderSide::Buy));
}

#[tokio::test]
async fn test_market_order_logs_info_before_call() {
    let (client, api, logs) = setup();
    let _guard = logs.install();

    api.order_market_buy("ETHBTC", "0.5").await;
    api.order_market_sell("ETHBTC", 1).await;

    let infos = logs.infos();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].message, "MARKET BUY 0.5 ETHBTC");
    assert_eq!(infos[1].message, "MARKET SELL 1.0 ETHBTC");
    assert!(logs.warnings().is_empty());
    assert_eq!(
        client.placed_orders()[1],
        PlacedOrder { symbol: "ETHBTC".to_string(), quantity: 1.0, side: OrderSide::Sell }
    );
}

#[tokio::test]
async fn test_invalid_quantity_never_reaches_client() {
    let (client, api, logs) = setup();
    let _guard = logs.install();

    api.order_market_buy("ETHBTC", "lots").await;

    assert!(client.placed_orders().is_empty());
    assert!(logs.infos().is_empty());
    assert_eq!(logs.warnings().len(), 1);
    assert!(logs.warnings()[0].message.contains("Invalid quantity"));
}

// =============================================================================
// try_* variants
// =============================================================================

#[tokio::test]
async fn test_try_variants_distinguish_empty_from_failure() {
    let (client, api, logs) = setup();
    let _guard = logs.install();

    assert_eq!(api.try_get_all_orders("BTCUSDT").await, Ok(vec![]));

    client.fail_next(ClientError::Timeout);
    assert_eq!(
        api.try_get_all_orders("BTCUSDT").await,
        Err(SpotApiError::Client(ClientError::Timeout))
    );

    assert!(logs.warnings().is_empty());
}

#[tokio::test]
async fn test_try_get_step_size_reports_cause() {
    let (client, api, _logs) = setup();
    client.add_symbol(fixtures::symbol_info_without_lot_size("ETHBTC"));

    assert_eq!(
        api.try_get_step_size("NOPE").await,
        Err(SpotApiError::SymbolNotFound("NOPE".to_string()))
    );
    assert_eq!(
        api.try_get_step_size("ETHBTC").await,
        Err(SpotApiError::LotSizeMissing("ETHBTC".to_string()))
    );
}

#[tokio::test]
async fn test_try_market_order_returns_ack() -> anyhow::Result<()> {
    let (_client, api, _logs) = setup();

    let ack = api.try_order_market_sell("BTCUSDT", dec!(0.01)).await?;

    assert_eq!(ack.symbol, "BTCUSDT");
    assert!(matches!(
        api.try_order_market_buy("BTCUSDT", "NaN").await,
        Err(SpotApiError::InvalidQuantity(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_cloned_facade_shares_client() {
    let (client, api, _logs) = setup();
    let other = api.clone();

    other.order_market_buy("BTCUSDT", 1).await;

    assert!(Arc::ptr_eq(api.client(), other.client()));
    assert_eq!(client.placed_orders().len(), 1);
    assert_eq!(api.get_step_size("BTCUSDT").await, Decimal::new(1, 3));
}
