//! Spotwrap Domain Layer
//!
//! Typed spot exchange data with zero I/O dependencies: tickers, account
//! snapshots, symbol trading rules, klines and orders.

#![warn(clippy::all)]

// Public modules
pub mod account;
pub mod credentials;
pub mod entities;
pub mod market_data;
pub mod symbol_rules;
pub mod value_objects;

// Re-export commonly used types
pub use account::{AccountSnapshot, Balance};
pub use credentials::ApiCredentials;
pub use entities::{Fill, Order, OrderAck, OrderStatus, OrderType};
pub use market_data::{Kline, KlineInterval, KlineQuery, Ticker};
pub use symbol_rules::{LotSize, SymbolFilter, SymbolInfo};
pub use value_objects::{DomainError, OrderSide, QuantityInput};
