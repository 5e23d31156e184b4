//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SousChefConfig;
use crate::spoonacular::RecipeClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SousChefConfig,
    pool: PgPool,
    recipes: RecipeClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: SousChefConfig, pool: PgPool) -> Self {
        let recipes = RecipeClient::new(&config.spoonacular);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                recipes,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &SousChefConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the recipe API client.
    #[must_use]
    pub fn recipes(&self) -> &RecipeClient {
        &self.inner.recipes
    }
}
