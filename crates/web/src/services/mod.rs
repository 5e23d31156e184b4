//! Business logic services for the web service.
//!
//! # Services
//!
//! - `ingredients` - Ingredient display labels and simulated shop prices
//! - `orders` - Cart pricing, order submission and order history
//!
//! Services wrap repositories and the recipe client; they take explicit
//! `UserId` parameters rather than reading the session themselves.

pub mod ingredients;
pub mod orders;

pub use orders::{OrderError, OrderService};
