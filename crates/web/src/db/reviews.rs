//! Recipe review repository.

use sqlx::PgPool;
use tracing::instrument;

use sous_chef_core::{Rating, RecipeId, ReviewId, UserId, Username};

use super::RepositoryError;
use crate::models::recipe::RecipeReview;

/// Message for a second review of the same recipe.
pub const ALREADY_REVIEWED: &str = "You've already left a review for this recipe";

/// A review as stored, without reviewer details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReview {
    pub recipe_id: RecipeId,
    pub rating: Rating,
    pub comment: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    recipe_id: RecipeId,
    rating: i32,
    comment: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct RecipeReviewRow {
    user_id: UserId,
    username: String,
    profile_pic: String,
    rating: i32,
    comment: Option<String>,
}

fn parse_rating(raw: i32) -> Result<Rating, RepositoryError> {
    Rating::new(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid rating in database: {e}")))
}

impl TryFrom<ReviewRow> for UserReview {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            recipe_id: row.recipe_id,
            rating: parse_rating(row.rating)?,
            comment: row.comment,
        })
    }
}

impl TryFrom<RecipeReviewRow> for RecipeReview {
    type Error = RepositoryError;

    fn try_from(row: RecipeReviewRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            user_id: row.user_id,
            username,
            profile_pic: row.profile_pic,
            rating: parse_rating(row.rating)?,
            comment: row.comment,
        })
    }
}

/// Repository for recipe reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already reviewed this recipe.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, comment))]
    pub async fn create(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<ReviewId, RepositoryError> {
        let id: ReviewId = sqlx::query_scalar(
            r"
            INSERT INTO reviews (user_id, recipe_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(rating.get())
        .bind(comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::conflict_on_unique(e, ALREADY_REVIEWED))?;

        Ok(id)
    }

    /// All reviews of a recipe with reviewer details, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn for_recipe(&self, recipe_id: RecipeId) -> Result<Vec<RecipeReview>, RepositoryError> {
        let rows: Vec<RecipeReviewRow> = sqlx::query_as(
            r"
            SELECT r.user_id, u.username, u.profile_pic, r.rating, r.comment
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.recipe_id = $1
            ORDER BY r.created_at, r.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RecipeReview::try_from).collect()
    }

    /// All reviews written by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<UserReview>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r"
            SELECT recipe_id, rating, comment
            FROM reviews
            WHERE user_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(UserReview::try_from).collect()
    }
}
