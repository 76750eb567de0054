//! Value Objects for the Spot domain
//!
//! Small validated primitives shared by the facade and the connectors.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Quantity could not be coerced to a finite number
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Kline interval is not one Binance accepts
    #[error("Invalid kline interval: {0}")]
    InvalidInterval(String),
}

// =============================================================================
// OrderSide
// =============================================================================

/// Side of a spot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy the base asset
    Buy,
    /// Sell the base asset
    Sell,
}

impl OrderSide {
    /// Wire representation (`BUY` / `SELL`).
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// QuantityInput
// =============================================================================

/// Anything a caller may pass as an order quantity.
///
/// Market orders go to the exchange client as `f64`, so integers, decimals
/// and numeric strings are all coerced here.
///
/// # Examples
/// ```
/// # use spotwrap_domain::QuantityInput;
/// assert_eq!(3_i32.to_quantity().unwrap(), 3.0);
/// assert_eq!(" 0.25 ".to_quantity().unwrap(), 0.25);
/// assert!("abc".to_quantity().is_err());
/// ```
pub trait QuantityInput {
    /// Coerce to a finite `f64`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidQuantity` for non-numeric or non-finite input
    fn to_quantity(&self) -> Result<f64, DomainError>;
}

fn finite(value: f64, raw: &dyn fmt::Display) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::InvalidQuantity(format!("{} is not finite", raw)))
    }
}

impl QuantityInput for f64 {
    fn to_quantity(&self) -> Result<f64, DomainError> {
        finite(*self, self)
    }
}

impl QuantityInput for f32 {
    fn to_quantity(&self) -> Result<f64, DomainError> {
        finite(f64::from(*self), self)
    }
}

macro_rules! impl_quantity_input_for_int {
    ($($t:ty),*) => {
        $(
            impl QuantityInput for $t {
                fn to_quantity(&self) -> Result<f64, DomainError> {
                    Ok(*self as f64)
                }
            }
        )*
    };
}

impl_quantity_input_for_int!(i32, i64, u32, u64, usize);

impl QuantityInput for Decimal {
    fn to_quantity(&self) -> Result<f64, DomainError> {
        ToPrimitive::to_f64(self)
            .ok_or_else(|| DomainError::InvalidQuantity(format!("{} does not fit in f64", self)))
    }
}

impl QuantityInput for str {
    fn to_quantity(&self) -> Result<f64, DomainError> {
        let value = self
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidQuantity(format!("'{}' is not a number", self)))?;
        finite(value, &self)
    }
}

impl QuantityInput for String {
    fn to_quantity(&self) -> Result<f64, DomainError> {
        self.as_str().to_quantity()
    }
}

impl<T: QuantityInput + ?Sized> QuantityInput for &T {
    fn to_quantity(&self) -> Result<f64, DomainError> {
        (**self).to_quantity()
    }
}
