//! Spoonacular recipe API client.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest`, authenticated with the `apiKey` query parameter
//! - The API is the source of truth for recipe and ingredient metadata; nothing
//!   is synced locally
//! - Lookups by ID (recipe information, nutrition, ingredient information) are
//!   cached in memory via `moka`
//! - The API never supplies prices; cart and order amounts come from the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use sous_chef_web::spoonacular::RecipeClient;
//!
//! let client = RecipeClient::new(&config.spoonacular);
//! let recipe = client.recipe_information(RecipeId::new(716_429)).await?;
//! let onion = client.ingredient_information(IngredientId::new(11_282)).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::RecipeClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the recipe API.
#[derive(Debug, Error)]
pub enum RecipeApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited (or daily quota exhausted).
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: u16,
        /// Leading part of the response body.
        message: String,
    },
}
