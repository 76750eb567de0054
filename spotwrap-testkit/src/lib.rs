//! Test helpers for Spotwrap.
//!
//! Provides tracing capture for asserting on facade log output, and
//! fixtures shaped like Binance Spot responses.

pub mod fixtures;
mod log_capture;

pub use log_capture::{CapturedEvent, LogCapture};
