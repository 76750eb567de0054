//! Exchange API credentials.
//!
//! The secret is held in a zeroizing buffer, wiped on drop and never
//! printed by `Debug`.

use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// API key pair for signed exchange endpoints.
pub struct ApiCredentials {
    /// API Key (public identifier)
    pub api_key: String,
    /// API Secret (secret key)
    pub api_secret: Zeroizing<String>,
}

impl ApiCredentials {
    /// Create new API credentials.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: Zeroizing::new(api_secret.into()),
        }
    }
}

impl Clone for ApiCredentials {
    fn clone(&self) -> Self {
        Self::new(self.api_key.clone(), self.api_secret.as_str())
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Zeroize for ApiCredentials {
    fn zeroize(&mut self) {
        self.api_key.zeroize();
        self.api_secret.zeroize();
    }
}

impl Drop for ApiCredentials {
    fn drop(&mut self) {
        self.zeroize();
    }
}
