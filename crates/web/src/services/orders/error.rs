//! Order service error types.

use thiserror::Error;

use sous_chef_core::PricingError;

use crate::db::RepositoryError;

/// Errors that can occur while pricing or submitting orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A line item was rejected by the pricing engine.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Submitted an order with no items.
    #[error("cannot submit an empty order")]
    EmptyOrder,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Could not start or commit the order transaction.
    #[error("transaction error: {0}")]
    Transaction(#[from] sqlx::Error),
}
