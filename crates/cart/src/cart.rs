//! The in-memory cart model.
//!
//! [`Cart`] is a plain value: an ordered list of line items, unique by
//! product id. It knows nothing about storage or subscribers; the
//! [`CartStore`](crate::CartStore) wraps it with those concerns.

use rust_decimal::Decimal;
use serde::Serialize;

use go_marketplace_core::{LineItem, ProductDescriptor, ProductId};

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Appended,
    /// An existing line had its quantity bumped.
    Incremented,
}

/// What [`Cart::decrement`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The line's quantity went down by one.
    Decremented,
    /// The line held a single unit and was removed.
    Removed,
    /// No line with that id exists.
    NotFound,
}

impl DecrementOutcome {
    /// Whether the cart was modified.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Two line items in one payload share a product id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate product id in cart: {0}")]
pub struct DuplicateProduct(pub ProductId);

/// Ordered collection of line items, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateProduct`] if two items share an id.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, DuplicateProduct> {
        for (index, item) in items.iter().enumerate() {
            if items.iter().take(index).any(|seen| seen.id == item.id) {
                return Err(DuplicateProduct(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Add one unit of a product.
    ///
    /// An existing line keeps its stored title, image and price; the
    /// descriptor's display fields are only used for a new line.
    pub fn add(&mut self, descriptor: ProductDescriptor) -> AddOutcome {
        if let Some(line) = self.get_mut(descriptor.id.as_str()) {
            line.increment();
            AddOutcome::Incremented
        } else {
            self.items.push(LineItem::new(descriptor));
            AddOutcome::Appended
        }
    }

    /// Add one unit to an existing line. Returns `false` if `id` is absent.
    pub fn increment(&mut self, id: &str) -> bool {
        self.get_mut(id).map(LineItem::increment).is_some()
    }

    /// Remove one unit from a line, dropping it when it reaches zero.
    pub fn decrement(&mut self, id: &str) -> DecrementOutcome {
        let Some(index) = self.position(id) else {
            return DecrementOutcome::NotFound;
        };

        let keep = self
            .items
            .get_mut(index)
            .is_some_and(LineItem::decrement);
        if keep {
            DecrementOutcome::Decremented
        } else {
            self.items.remove(index);
            DecrementOutcome::Removed
        }
    }

    /// Line items in cart order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of all line totals.
    ///
    /// Returns `None` if any line total or the running sum overflows. Stored
    /// prices are not bounded, so this can happen on carts loaded from storage.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
