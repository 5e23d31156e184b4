//! Sous Chef Core - Domain types and pricing logic.
//!
//! This crate is shared by every Sous Chef component:
//! - `web` - JSON API for recipes, favorites, reviews, cart and orders
//! - `cli` - Migrations and order inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything in [`pricing`] is synchronous and safe
//! to call concurrently.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, ratings and currency
//! - [`pricing`] - Cart pricing, order-number allocation and history aggregation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{
    InvalidOrderNumber, LineItem, Order, OrderLine, OrderNumber, PricedCart, PricedLine, PricingError,
    aggregate_history, next_order_number, price_cart,
};
pub use types::*;
