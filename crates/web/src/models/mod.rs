//! Domain and response models for the web service.
//!
//! Database rows are mapped into these types by the repositories in
//! [`crate::db`]; recipe API payloads are reshaped into them by the
//! conversions in [`recipe`].

pub mod cart;
pub mod recipe;
pub mod session;
pub mod user;

pub use session::CurrentUser;
pub use user::User;
