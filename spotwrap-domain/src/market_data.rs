//! Market Data Types
//!
//! Ticker prices and kline (candlestick) data as returned by the spot API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

// =============================================================================
// Ticker
// =============================================================================

/// Latest price for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Trading pair (e.g. "BTCUSDT")
    pub symbol: String,
    /// Last traded price
    pub price: Decimal,
}

// =============================================================================
// Kline Interval
// =============================================================================

/// Candle interval accepted by the klines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1s")]
    OneSecond,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "8h")]
    EightHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl KlineInterval {
    const ALL: [KlineInterval; 16] = [
        KlineInterval::OneSecond,
        KlineInterval::OneMinute,
        KlineInterval::ThreeMinutes,
        KlineInterval::FiveMinutes,
        KlineInterval::FifteenMinutes,
        KlineInterval::ThirtyMinutes,
        KlineInterval::OneHour,
        KlineInterval::TwoHours,
        KlineInterval::FourHours,
        KlineInterval::SixHours,
        KlineInterval::EightHours,
        KlineInterval::TwelveHours,
        KlineInterval::OneDay,
        KlineInterval::ThreeDays,
        KlineInterval::OneWeek,
        KlineInterval::OneMonth,
    ];

    /// Wire representation (e.g. "1h").
    pub fn as_str(&self) -> &'static str {
        match self {
            KlineInterval::OneSecond => "1s",
            KlineInterval::OneMinute => "1m",
            KlineInterval::ThreeMinutes => "3m",
            KlineInterval::FiveMinutes => "5m",
            KlineInterval::FifteenMinutes => "15m",
            KlineInterval::ThirtyMinutes => "30m",
            KlineInterval::OneHour => "1h",
            KlineInterval::TwoHours => "2h",
            KlineInterval::FourHours => "4h",
            KlineInterval::SixHours => "6h",
            KlineInterval::EightHours => "8h",
            KlineInterval::TwelveHours => "12h",
            KlineInterval::OneDay => "1d",
            KlineInterval::ThreeDays => "3d",
            KlineInterval::OneWeek => "1w",
            KlineInterval::OneMonth => "1M",
        }
    }

    /// Nominal interval length in milliseconds.
    ///
    /// A month is counted as 30 days, so `1M` candles are not exactly
    /// this long.
    pub fn duration_ms(&self) -> i64 {
        const SECOND: i64 = 1_000;
        const MINUTE: i64 = 60 * SECOND;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;

        match self {
            KlineInterval::OneSecond => SECOND,
            KlineInterval::OneMinute => MINUTE,
            KlineInterval::ThreeMinutes => 3 * MINUTE,
            KlineInterval::FiveMinutes => 5 * MINUTE,
            KlineInterval::FifteenMinutes => 15 * MINUTE,
            KlineInterval::ThirtyMinutes => 30 * MINUTE,
            KlineInterval::OneHour => HOUR,
            KlineInterval::TwoHours => 2 * HOUR,
            KlineInterval::FourHours => 4 * HOUR,
            KlineInterval::SixHours => 6 * HOUR,
            KlineInterval::EightHours => 8 * HOUR,
            KlineInterval::TwelveHours => 12 * HOUR,
            KlineInterval::OneDay => DAY,
            KlineInterval::ThreeDays => 3 * DAY,
            KlineInterval::OneWeek => 7 * DAY,
            KlineInterval::OneMonth => 30 * DAY,
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KlineInterval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInterval(s.to_string()))
    }
}

// =============================================================================
// Kline Query
// =============================================================================

/// Arguments for a historical klines request.
///
/// The facade forwards this value to the client untouched.
///
/// # Examples
/// ```
/// # use spotwrap_domain::{KlineInterval, KlineQuery};
/// let query = KlineQuery::new("BTCUSDT", KlineInterval::OneHour).with_limit(500);
/// assert_eq!(query.limit, Some(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineQuery {
    /// Trading pair
    pub symbol: String,
    /// Candle interval
    pub interval: KlineInterval,
    /// Inclusive start of the range (open time)
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive end of the range (open time)
    pub end_time: Option<DateTime<Utc>>,
    /// Rows per request
    pub limit: Option<u16>,
}

impl KlineQuery {
    /// Create a query for the most recent candles of `symbol`.
    pub fn new(symbol: impl Into<String>, interval: KlineInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    /// Set the start of the range.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Set the end of the range.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = Some(end);
        self
    }

    /// Set the per-request row limit.
    pub fn with_limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit);
        self
    }
}

// =============================================================================
// Kline
// =============================================================================

/// OHLCV candlestick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kline {
    /// Candle open time
    pub open_time: DateTime<Utc>,
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Base asset volume
    pub volume: Decimal,
    /// Candle close time
    pub close_time: DateTime<Utc>,
    /// Quote asset volume
    pub quote_volume: Decimal,
    /// Number of trades
    pub trades: u64,
    /// Taker buy base asset volume
    pub taker_buy_base_volume: Decimal,
    /// Taker buy quote asset volume
    pub taker_buy_quote_volume: Decimal,
}
