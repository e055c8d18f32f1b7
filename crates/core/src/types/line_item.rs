//! Cart line items and the product descriptors they are created from.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Display data for a product being added to the cart.
///
/// This is a [`LineItem`] without a quantity. Only the first descriptor seen
/// for a given id is kept; later descriptors for the same id only bump the
/// quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

/// One product's presence in the cart.
///
/// The quantity is always at least 1; a line whose quantity would drop to
/// zero is removed from the cart instead. Persisted payloads carrying a zero
/// quantity fail to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line item with quantity 1 from a descriptor.
    #[must_use]
    pub fn new(descriptor: ProductDescriptor) -> Self {
        let ProductDescriptor {
            id,
            title,
            image_url,
            price,
        } = descriptor;

        Self {
            id,
            title,
            image_url,
            price,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Add one unit. Saturates at `u32::MAX`.
    pub const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Remove one unit.
    ///
    /// Returns `false` when the line holds a single unit and must be dropped
    /// from the cart; the quantity is left untouched in that case.
    pub fn decrement(&mut self) -> bool {
        match NonZeroU32::new(self.quantity.get() - 1) {
            Some(quantity) => {
                self.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Price of the whole line (unit price times quantity).
    ///
    /// Returns `None` on decimal overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.times(self.quantity)
    }
}

impl From<ProductDescriptor> for LineItem {
    fn from(descriptor: ProductDescriptor) -> Self {
        Self::new(descriptor)
    }
}
