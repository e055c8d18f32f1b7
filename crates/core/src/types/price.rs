//! Product price using decimal arithmetic.
//!
//! Prices are display data for the cart: the only arithmetic performed on
//! them is the read-side line total and cart subtotal, both checked for
//! overflow. They are persisted as plain JSON numbers so stored carts stay
//! readable by other clients.

use core::fmt;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price in the store's currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, or `None` if the product does not fit in a
    /// [`Decimal`].
    #[must_use]
    pub fn times(&self, quantity: NonZeroU32) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity.get()))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        let price = Price::from(Decimal::from(10));
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "10.0");
    }

    #[test]
    fn test_deserializes_integer_and_fraction() {
        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole.amount(), Decimal::from(10));

        let half: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(half, Price::from_cents(1250));
    }

    #[test]
    fn test_times() {
        let price = Price::from_cents(1250);
        let quantity = NonZeroU32::new(3).unwrap();
        assert_eq!(price.times(quantity), Some(Decimal::new(3750, 2)));
    }

    #[test]
    fn test_times_overflow() {
        let price = Price::from(Decimal::MAX);
        assert_eq!(price.times(NonZeroU32::MIN), Some(Decimal::MAX));
        assert_eq!(price.times(NonZeroU32::new(2).unwrap()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(999).to_string(), "9.99");
        assert_eq!(Price::from(Decimal::from(10)).to_string(), "10.00");
    }
}
