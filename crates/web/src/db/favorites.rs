//! Favorite recipes repository.

use sqlx::PgPool;
use tracing::{debug, instrument};

use sous_chef_core::{RecipeId, UserId};

use super::RepositoryError;

/// Repository for a user's favorite recipes.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorites repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Recipe IDs the user has favorited, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn recipe_ids(&self, user_id: UserId) -> Result<Vec<RecipeId>, RepositoryError> {
        let ids: Vec<RecipeId> =
            sqlx::query_scalar("SELECT recipe_id FROM favorites WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(self.pool)
                .await?;
        Ok(ids)
    }

    /// Flip a recipe's favorite state for the user.
    ///
    /// Returns `true` if the recipe is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn toggle(&self, user_id: UserId, recipe_id: RecipeId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                r"
                INSERT INTO favorites (user_id, recipe_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, recipe_id) DO NOTHING
                ",
            )
            .bind(user_id)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let favorite = removed == 0;
        debug!(favorite, "Toggled favorite");
        Ok(favorite)
    }
}
