//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the types shared by all GoMarketplace components:
//! - `cart` - The cart state container and its storage backends
//! - `cli` - Command-line consumer of the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
