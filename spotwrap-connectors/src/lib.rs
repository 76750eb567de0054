//! Spotwrap Exchange Connectors
//!
//! Exchange clients implementing the [`spotwrap_api::SpotClient`] port.
//!
//! # Modules
//!
//! - `binance_rest`: Binance Spot REST client (HMAC SHA256 signed)
//! - `config`: environment-driven client configuration

#![warn(clippy::all)]

pub mod binance_rest;
pub mod config;

pub use binance_rest::{BinanceRestError, BinanceSpotClient, MAX_KLINES_PER_REQUEST};
pub use config::{BinanceConfig, ConfigError, BINANCE_API_URL, BINANCE_TESTNET_URL};
