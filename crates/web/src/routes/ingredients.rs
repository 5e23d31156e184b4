//! Ingredient search and substitutes.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::recipe::{PricedIngredient, Substitutes, ingredient_image_url};
use crate::services::ingredients::simulated_price;
use crate::state::AppState;

/// `?ingredient=` query shared by both endpoints.
#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    #[serde(default)]
    pub ingredient: String,
}

impl IngredientQuery {
    fn term(&self) -> Result<&str> {
        let term = self.ingredient.trim();
        if term.is_empty() {
            return Err(AppError::BadRequest("ingredient is required".to_string()));
        }
        Ok(term)
    }
}

/// `GET /ingredients/substitutes?ingredient=...`
///
/// An unknown ingredient is a `"failure"` status with no substitutes, not an
/// error.
#[instrument(skip(state))]
pub async fn substitutes(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Substitutes>> {
    let response = state.recipes().ingredient_substitutes(query.term()?).await?;

    Ok(Json(Substitutes {
        status: response.status,
        ingredient: response.ingredient,
        substitutes: response.substitutes,
    }))
}

/// `GET /ingredients/search?ingredient=...`
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<PricedIngredient>>> {
    let hits = state.recipes().search_ingredients(query.term()?).await?;

    let mut rng = rand::rng();
    Ok(Json(
        hits.into_iter()
            .map(|hit| PricedIngredient {
                id: hit.id,
                name: hit.name,
                image: ingredient_image_url(hit.image.as_deref()),
                price: simulated_price(&mut rng),
            })
            .collect(),
    ))
}
