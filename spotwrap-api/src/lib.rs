//! Spotwrap API facade
//!
//! A fail-soft facade over an authenticated spot exchange client.
//!
//! # Components
//!
//! - **Ports**: the [`SpotClient`] trait every exchange client implements
//! - **Facade**: [`SpotApi`], one method per client call, each with a
//!   `try_*` variant that keeps the error
//! - **Stub**: [`StubSpotClient`], an in-memory client for tests
//!
//! # Example
//!
//! ```rust
//! use spotwrap_api::{ClientError, SpotApi, StubSpotClient};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let client = Arc::new(StubSpotClient::new());
//! let api = SpotApi::new(Arc::clone(&client));
//!
//! client.fail_next(ClientError::Timeout);
//! assert!(api.get_account().await.balances.is_empty());
//! assert_eq!(api.get_step_size("ETHBTC").await.to_string(), "0.001");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod facade;
pub mod ports;
pub mod stub;

// Re-exports for convenience
pub use error::{ClientError, SpotApiError, SpotApiResult};
pub use facade::{SpotApi, DEFAULT_STEP_SIZE};
pub use ports::SpotClient;
pub use stub::{PlacedOrder, StubSpotClient};
