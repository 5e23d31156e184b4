//! Order inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Print a user's order history, newest first
//! sous-chef orders history --user 7
//!
//! # Price an ad-hoc cart (ingredient:count:price)
//! sous-chef orders price --item 9003:2:1.50 --item 11215:3:0.99
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use sous_chef_core::{IngredientId, LineItem, PricingError, UserId, aggregate_history, price_cart};
use sous_chef_web::db::{OrderRepository, RepositoryError};

/// Errors that can occur during order commands.
#[derive(Debug, Error)]
pub enum OrdersError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// A line item was rejected.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Parse an `ingredient:count:price` triple.
///
/// # Errors
///
/// Returns a message naming the bad part.
pub fn parse_item(raw: &str) -> Result<LineItem, String> {
    let mut parts = raw.split(':');
    let (Some(id), Some(count), Some(price), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected ingredient:count:price, got '{raw}'"));
    };

    let id = IngredientId::from_str(id.trim())
        .map_err(|e| format!("invalid ingredient id '{id}': {e}"))?;
    let count = count
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid count '{count}': {e}"))?;
    let price = Decimal::from_str(price.trim())
        .map_err(|e| format!("invalid price '{price}': {e}"))?;

    Ok(LineItem::new(id, count, price))
}

/// Print a user's aggregated order history.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a stored line is invalid.
pub async fn history(user_id: UserId) -> Result<(), OrdersError> {
    let database_url =
        super::database_url().ok_or(OrdersError::MissingEnvVar("SOUS_CHEF_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let lines = OrderRepository::new(&pool).lines_for_user(user_id).await?;
    let orders = aggregate_history(lines);

    if orders.is_empty() {
        tracing::info!("User {} has no orders", user_id);
        return Ok(());
    }

    for order in &orders {
        tracing::info!("Order #{} total {}", order.order_number, order.order_total);
        for line in &order.items {
            tracing::info!(
                "  ingredient {}: {} x {} = {}",
                line.item.identifier,
                line.item.unit_count,
                line.item.unit_price,
                line.line_total
            );
        }
    }

    Ok(())
}

/// Price an ad-hoc cart and print the totals.
///
/// # Errors
///
/// Returns `OrdersError::Pricing` if any line is invalid.
pub fn price(items: &[LineItem]) -> Result<(), OrdersError> {
    let cart = price_cart(items)?;

    for line in &cart.items {
        tracing::info!(
            "ingredient {}: {} x {} = {}",
            line.item.identifier,
            line.item.unit_count,
            line.item.unit_price,
            line.line_total
        );
    }
    tracing::info!("Cart total: {}", cart.cart_total);

    Ok(())
}
