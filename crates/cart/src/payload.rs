//! Persisted cart payload.
//!
//! The cart is stored as a bare JSON array of line items:
//!
//! ```json
//! [{"id":"p1","title":"Shirt","image_url":"u","price":10.0,"quantity":2}]
//! ```
//!
//! There is no version tag. A payload that does not match this shape, or that
//! repeats a product id, is rejected and the caller treats it as absent.

use thiserror::Error;

use go_marketplace_core::LineItem;

use crate::cart::{Cart, DuplicateProduct};

/// A stored payload could not be turned back into a cart.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed cart payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Duplicate(#[from] DuplicateProduct),
}

/// Serialize a cart for storage.
///
/// # Errors
///
/// Returns an error if serialization fails, which only happens for prices
/// that cannot be represented as a JSON number.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}

/// Parse a stored payload.
///
/// # Errors
///
/// Returns [`PayloadError`] if the payload is not a JSON array of line items
/// or contains duplicate product ids. A line whose `quantity` is zero or above
/// `u32::MAX`, or whose `price` is outside the [`Decimal`](rust_decimal::Decimal)
/// range, makes the whole payload malformed.
pub fn decode(payload: &str) -> Result<Cart, PayloadError> {
    let items: Vec<LineItem> = serde_json::from_str(payload)?;
    Ok(Cart::from_items(items)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::{Price, ProductDescriptor, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn cart_with(ids: &[&str]) -> Cart {
        let mut cart = Cart::new();
        for id in ids {
            cart.add(ProductDescriptor {
                id: ProductId::parse(id).unwrap(),
                title: format!("Product {id}"),
                image_url: "u".to_string(),
                price: Price::from_cents(1250),
            });
        }
        cart
    }

    #[test]
    fn test_encode_then_decode_preserves_order_and_fields() {
        let mut cart = cart_with(&["p2", "p1", "p3"]);
        cart.increment("p1");

        let decoded = decode(&encode(&cart).unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_decode_foreign_payload() {
        let payload = r#"[
            {"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":2},
            {"id":"p2","title":"Hat","image_url":"v","price":4.5,"quantity":1}
        ]"#;
        let cart = decode(payload).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Some(Decimal::new(245, 1)));
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_out_of_range_numbers() {
        let too_many = r#"[{"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":4294967296}]"#;
        assert!(matches!(decode(too_many), Err(PayloadError::Json(_))));

        let too_dear = r#"[{"id":"p1","title":"Shirt","image_url":"u","price":1e40,"quantity":1}]"#;
        assert!(matches!(decode(too_dear), Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_decode_accepts_price_whose_total_overflows() {
        let payload = r#"[{"id":"p1","title":"Yacht","image_url":"u","price":60000000000000000000000000000,"quantity":2}]"#;
        let cart = decode(payload).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.subtotal(), None);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode("not json"), Err(PayloadError::Json(_))));
        assert!(matches!(decode("{}"), Err(PayloadError::Json(_))));
        assert!(matches!(
            decode(r#"[{"id":"p1","title":"Shirt"}]"#),
            Err(PayloadError::Json(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicates() {
        let payload = r#"[
            {"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":1},
            {"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":3}
        ]"#;
        assert!(matches!(decode(payload), Err(PayloadError::Duplicate(_))));
    }
}
