//! Connector configuration.
//!
//! Loads Binance credentials and client settings from environment
//! variables with sensible defaults.

use std::env;
use std::time::Duration;
use thiserror::Error;

use spotwrap_domain::ApiCredentials;

/// Binance REST API base URL (Spot)
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Binance Spot testnet base URL
pub const BINANCE_TESTNET_URL: &str = "https://testnet.binance.vision";

/// Request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Largest `recvWindow` Binance accepts
const MAX_RECV_WINDOW_MS: u64 = 60_000;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Required variable is not set
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    /// Variable is set but cannot be parsed
    #[error("Invalid {key} value: {value}")]
    Invalid { key: String, value: String },
}

/// Binance Spot client configuration.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// API key pair for signed endpoints
    pub credentials: ApiCredentials,
    /// REST base URL
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// `recvWindow` sent with signed requests
    pub recv_window_ms: Option<u64>,
}

impl BinanceConfig {
    /// Mainnet configuration with default settings.
    pub fn new(credentials: ApiCredentials) -> Self {
        Self {
            credentials,
            base_url: BINANCE_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            recv_window_ms: None,
        }
    }

    /// Testnet configuration with default settings.
    pub fn testnet(credentials: ApiCredentials) -> Self {
        Self {
            base_url: BINANCE_TESTNET_URL.to_string(),
            ..Self::new(credentials)
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BINANCE_API_KEY`: API key (required)
    /// - `BINANCE_API_SECRET`: API secret (required)
    /// - `BINANCE_TESTNET`: use the testnet URL (default: false)
    /// - `BINANCE_BASE_URL`: override the base URL
    /// - `BINANCE_TIMEOUT_SECS`: request timeout (default: 10)
    /// - `BINANCE_RECV_WINDOW_MS`: recvWindow for signed calls (max 60000)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()));

        let credentials = ApiCredentials::new(required("BINANCE_API_KEY")?, required("BINANCE_API_SECRET")?);

        let testnet = match lookup("BINANCE_TESTNET") {
            Some(value) => parse_bool("BINANCE_TESTNET", &value)?,
            None => false,
        };

        let mut config = if testnet {
            Self::testnet(credentials)
        } else {
            Self::new(credentials)
        };

        if let Some(url) = lookup("BINANCE_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(value) = lookup("BINANCE_TIMEOUT_SECS") {
            let secs = value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid("BINANCE_TIMEOUT_SECS", &value))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup("BINANCE_RECV_WINDOW_MS") {
            let window = value
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0 && *ms <= MAX_RECV_WINDOW_MS)
                .ok_or_else(|| invalid("BINANCE_RECV_WINDOW_MS", &value))?;
            config.recv_window_ms = Some(window);
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}
