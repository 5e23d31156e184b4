//! Core types for Sous Chef.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod rating;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CURRENCY_SCALE, round_currency};
pub use rating::{Rating, RatingError};
pub use username::{Username, UsernameError};
