//! Recipe browsing, search, favorites and reviews.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sous_chef_core::{Rating, RecipeId};

use crate::db::{FavoriteRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::CurrentUser;
use crate::models::recipe::{
    CreatedReview, FavoriteStatus, FoundRecipeView, Nutrition, RecipeDetail, RecipePage,
    RecipeSummary,
};
use crate::spoonacular::{RecipeSearchHit, parse_diet_filters};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// `GET /recipes/random` query.
#[derive(Debug, Default, Deserialize)]
pub struct RandomQuery {
    /// Comma-separated diet filters, e.g. `vegan,cheap`.
    #[serde(default)]
    pub tags: Option<String>,
}

/// `GET /recipes/search` query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// `POST /recipes/by-ingredients` request body.
#[derive(Debug, Deserialize)]
pub struct ByIngredientsRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// `POST /recipes/favorite` request body.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub recipe_id: RecipeId,
}

/// `POST /recipes/{id}/reviews` request body.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// The signed-in user's favorite recipe IDs, or `None` when signed out.
async fn favorites_for(
    state: &AppState,
    user: Option<&CurrentUser>,
) -> Result<Option<Vec<RecipeId>>> {
    match user {
        Some(user) => Ok(Some(
            FavoriteRepository::new(state.pool())
                .recipe_ids(user.id)
                .await?,
        )),
        None => Ok(None),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /recipes/random?tags=...`
#[instrument(skip(state, user))]
pub async fn random(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<RandomQuery>,
) -> Result<Json<Vec<RecipeSummary>>> {
    let tags = parse_diet_filters(query.tags.as_deref().unwrap_or_default())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let recipes = state.recipes().random_recipes(&tags).await?;
    let favorites = favorites_for(&state, user.as_ref()).await?;

    Ok(Json(
        recipes
            .iter()
            .map(|info| RecipeSummary::from(info).with_favorites(favorites.as_deref()))
            .collect(),
    ))
}

/// `GET /recipes/{id}`
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<RecipeId>,
) -> Result<Json<RecipePage>> {
    let recipes = state.recipes();
    let (info, nutrition) = tokio::try_join!(recipes.recipe_information(id), recipes.nutrition(id))?;

    let reviews = ReviewRepository::new(state.pool()).for_recipe(id).await?;
    let favorites = favorites_for(&state, user.as_ref()).await?;
    let user_review = user
        .as_ref()
        .and_then(|u| reviews.iter().find(|r| r.user_id == u.id).cloned());

    let mut recipe = RecipeDetail::from(info);
    recipe.summary = recipe.summary.with_favorites(favorites.as_deref());

    Ok(Json(RecipePage {
        recipe,
        nutrition: Nutrition::from(nutrition),
        reviews,
        user_review,
    }))
}

/// `GET /recipes/search?search=...`
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RecipeSearchHit>>> {
    let term = query.search.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("search term is required".to_string()));
    }

    Ok(Json(state.recipes().search_recipes(term).await?))
}

/// `POST /recipes/by-ingredients`
#[instrument(skip(state, user, body))]
pub async fn by_ingredients(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(body): Json<ByIngredientsRequest>,
) -> Result<Json<Vec<FoundRecipeView>>> {
    let ingredients: Vec<String> = body
        .ingredients
        .iter()
        .map(|i| i.trim().to_owned())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(AppError::BadRequest(
            "at least one ingredient is required".to_string(),
        ));
    }

    let found = state.recipes().find_by_ingredients(&ingredients).await?;
    let favorites = favorites_for(&state, user.as_ref()).await?;

    Ok(Json(
        found
            .into_iter()
            .map(|recipe| FoundRecipeView::new(recipe, favorites.as_deref()))
            .collect(),
    ))
}

/// `POST /recipes/favorite` - add or remove a favorite.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<FavoriteStatus>> {
    let favorite = FavoriteRepository::new(state.pool())
        .toggle(user.id, body.recipe_id)
        .await?;

    Ok(Json(FavoriteStatus {
        recipe_id: body.recipe_id,
        favorite,
    }))
}

/// `POST /recipes/{id}/reviews`
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_review(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(recipe_id): Path<RecipeId>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<CreatedReview>)> {
    let rating = Rating::new(body.rating).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let comment = body
        .comment
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty());

    let id = ReviewRepository::new(state.pool())
        .create(user.id, recipe_id, rating, comment.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReview {
            id,
            recipe_id,
            rating,
            comment,
        }),
    ))
}
