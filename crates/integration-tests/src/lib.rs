//! Integration tests for the GoMarketplace cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end add/increment/decrement flows
//! - `file_persistence` - Carts surviving a restart on disk
//!
//! This library holds the fixtures shared by those tests.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use uuid::Uuid;

use go_marketplace_core::{Price, ProductDescriptor, ProductId};

/// A product descriptor with the given id, title and whole-unit price.
///
/// # Panics
///
/// Panics if `id` is not a valid product id.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(id: &str, title: &str, price: i64) -> ProductDescriptor {
    ProductDescriptor {
        id: ProductId::parse(id).unwrap(),
        title: title.to_string(),
        image_url: format!("https://cdn.example.com/{id}.png"),
        price: Price::from(Decimal::from(price)),
    }
}

/// Uniquely named directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(format!("gm-cart-it-{}", Uuid::new_v4())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
