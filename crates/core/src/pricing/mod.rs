//! Cart and order pricing engine.
//!
//! Three pure operations over priced line items:
//!
//! - [`price_cart`] - per-line totals and a grand total for an unsubmitted cart
//! - [`next_order_number`] - the next per-user sequential order number
//! - [`aggregate_history`] - regroups persisted order lines into orders,
//!   newest first
//!
//! None of these touch shared state. Allocating an order number and inserting
//! the order's rows must still happen in one transaction on the persistence
//! side, otherwise two concurrent submissions can compute the same number.
//!
//! # Rounding
//!
//! Currency is `rust_decimal::Decimal`. Products and sums are kept at full
//! precision and rounded half away from zero to two places only when a total
//! is produced (see [`crate::round_currency`]).

mod cart;
mod orders;

pub use cart::{LineItem, PricedCart, PricedLine, price_cart};
pub use orders::{
    InvalidOrderNumber, Order, OrderLine, OrderNumber, aggregate_history, next_order_number,
};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::IngredientId;

/// Errors reported by the pricing engine.
///
/// These are input errors, never transient faults: callers should surface them
/// to the user rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A line item has a zero or negative unit count.
    #[error("invalid quantity {count} for ingredient {identifier}: must be at least 1")]
    InvalidQuantity {
        /// The offending item.
        identifier: IngredientId,
        /// The rejected count.
        count: i32,
    },

    /// A line item has a negative unit price.
    #[error("invalid price {price} for ingredient {identifier}: must not be negative")]
    InvalidPrice {
        /// The offending item.
        identifier: IngredientId,
        /// The rejected price.
        price: Decimal,
    },

    /// A line or cart total does not fit in a `Decimal`.
    #[error("total for ingredient {identifier} is too large")]
    AmountOverflow {
        /// The item whose total overflowed.
        identifier: IngredientId,
    },

    /// The user already holds the largest representable order number.
    #[error("order number {last} cannot be incremented")]
    OrderNumberExhausted {
        /// The current highest order number.
        last: OrderNumber,
    },
}
