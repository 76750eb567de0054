//! Error types for the spot facade and its client contract.

use spotwrap_domain::DomainError;
use thiserror::Error;

/// Failures a [`SpotClient`](crate::SpotClient) may report.
///
/// This is the only error kind the facade catches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, DNS, non-JSON error body)
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Exchange rejected the request
    #[error("Exchange API error: {code} - {msg}")]
    Api { code: i64, msg: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Request exceeded the client's timeout
    #[error("Request timed out")]
    Timeout,

    /// Client refused to send the request
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Request signing failed
    #[error("Failed to build signature: {0}")]
    Signature(String),
}

/// Errors surfaced by the `try_*` facade operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpotApiError {
    /// Underlying client call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Caller-supplied quantity could not be coerced
    #[error(transparent)]
    InvalidQuantity(#[from] DomainError),

    /// Exchange has no trading rules for the symbol
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Symbol rules carry no LOT_SIZE filter
    #[error("No LOT_SIZE filter for symbol: {0}")]
    LotSizeMissing(String),
}

/// Result type for facade operations.
pub type SpotApiResult<T> = Result<T, SpotApiError>;
