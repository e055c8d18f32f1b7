//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart show
//!
//! # Add a product (or one more unit of it)
//! gm-cart add --id p1 --title "Shirt" --image-url https://cdn.example.com/p1.png --price 10
//!
//! # Change quantities
//! gm-cart increment p1
//! gm-cart decrement p1
//! ```
//!
//! Every command opens the cart from `CART_STORAGE_DIR`, applies its change,
//! waits for the write to land, and prints the resulting cart.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use go_marketplace_cart::{
    Cart, CartConfig, CartError, CartStore, FileStorage, Price, ProductDescriptor, ProductId,
};

/// A change to apply to the cart.
#[derive(Debug, Clone)]
pub enum CartAction {
    Show,
    Add(ProductDescriptor),
    Increment(String),
    Decrement(String),
}

impl CartAction {
    /// Build an `Add` action from raw CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid product id.
    pub fn add(
        id: &str,
        title: String,
        image_url: String,
        price: Decimal,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::Add(ProductDescriptor {
            id: ProductId::parse(id)?,
            title,
            image_url,
            price: Price::new(price),
        }))
    }
}

/// Open the configured cart, apply `action`, persist, and return the cart.
///
/// # Errors
///
/// Returns an error if the stored cart cannot be read or the writer fails.
#[instrument(skip(config), fields(dir = %config.storage_dir.display()))]
pub async fn run(config: &CartConfig, action: CartAction) -> Result<Cart, CartError> {
    let storage = FileStorage::new(&config.storage_dir);
    let store = CartStore::open(storage, config.storage_key.clone()).await?;

    apply(&store, action);
    store.shutdown().await?;

    let cart = store.snapshot();
    info!(items = cart.len(), quantity = cart.total_quantity(), "Cart updated");
    Ok(cart)
}

/// Apply one action to an open store.
pub fn apply<S: go_marketplace_cart::KeyValueStorage>(store: &CartStore<S>, action: CartAction) {
    match action {
        CartAction::Show => {}
        CartAction::Add(descriptor) => store.add_to_cart(descriptor),
        CartAction::Increment(id) => store.increment(&id),
        CartAction::Decrement(id) => store.decrement(&id),
    }
}

/// Render the cart as a plain-text table.
#[must_use]
pub fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "{:<16} {:<32} {:>4} x {:>10.2} = {:>10.2}",
            item.id.as_str(),
            item.title,
            item.quantity,
            item.price.amount(),
            money(item.line_total()),
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        cart.total_quantity(),
        money(cart.subtotal())
    );
    out
}

fn money(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "overflow".to_string(), |value| format!("{value:.2}"))
}
