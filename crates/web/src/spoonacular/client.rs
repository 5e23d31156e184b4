//! Recipe API client implementation.
//!
//! Lookups by ID are cached with `moka` for the configured TTL. Random recipes
//! and searches always go to the API.

use std::sync::Arc;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use sous_chef_core::{IngredientId, RecipeId};
use tracing::{debug, instrument};

use super::RecipeApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    DietFilter, FoundRecipe, IngredientHit, IngredientInformation, NutritionWidget,
    RandomRecipes, RecipeInformation, RecipeSearchHit, SearchResults, SubstitutesResponse,
};
use crate::config::SpoonacularConfig;

/// Number of results requested from list endpoints.
const RESULT_COUNT: &str = "10";

/// Client for the Spoonacular REST API.
#[derive(Clone)]
pub struct RecipeClient {
    inner: Arc<RecipeClientInner>,
}

struct RecipeClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl RecipeClient {
    /// Create a new recipe API client.
    #[must_use]
    pub fn new(config: &SpoonacularConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(RecipeClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Issue a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RecipeApiError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .query(&[("apiKey", self.inner.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(RecipeApiError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RecipeApiError::NotFound(path.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Recipe API returned non-success status"
            );
            return Err(RecipeApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse recipe API response"
            );
            RecipeApiError::Parse(e)
        })
    }

    // =========================================================================
    // Recipe Methods
    // =========================================================================

    /// Get ten random recipes, optionally restricted to the given tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn random_recipes(
        &self,
        tags: &[DietFilter],
    ) -> Result<Vec<RecipeInformation>, RecipeApiError> {
        let mut params = vec![("number", RESULT_COUNT.to_string())];
        if !tags.is_empty() {
            let joined = tags
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("tags", joined));
        }

        let data: RandomRecipes = self.get("/recipes/random", &params).await?;
        Ok(data.recipes)
    }

    /// Get full information for a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is not found or the API request fails.
    #[instrument(skip(self), fields(recipe_id = %id))]
    pub async fn recipe_information(
        &self,
        id: RecipeId,
    ) -> Result<RecipeInformation, RecipeApiError> {
        let cache_key = CacheKey::Recipe(id);

        if let Some(CacheValue::Recipe(recipe)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for recipe");
            return Ok(*recipe);
        }

        let recipe: RecipeInformation = self
            .get(&format!("/recipes/{id}/information"), &[])
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Recipe(Box::new(recipe.clone())))
            .await;

        Ok(recipe)
    }

    /// Get the nutrition summary for a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is not found or the API request fails.
    #[instrument(skip(self), fields(recipe_id = %id))]
    pub async fn nutrition(&self, id: RecipeId) -> Result<NutritionWidget, RecipeApiError> {
        let cache_key = CacheKey::Nutrition(id);

        if let Some(CacheValue::Nutrition(widget)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for nutrition");
            return Ok(*widget);
        }

        let widget: NutritionWidget = self
            .get(&format!("/recipes/{id}/nutritionWidget.json"), &[])
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Nutrition(Box::new(widget.clone())))
            .await;

        Ok(widget)
    }

    /// Find recipes that use the given ingredients, maximising used ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_by_ingredients(
        &self,
        ingredients: &[String],
    ) -> Result<Vec<FoundRecipe>, RecipeApiError> {
        let params = [
            ("ingredients", ingredients.join(",")),
            ("number", RESULT_COUNT.to_string()),
            ("limitLicense", "true".to_string()),
            ("ranking", "2".to_string()),
            ("ignorePantry", "true".to_string()),
        ];

        self.get("/recipes/findByIngredients", &params).await
    }

    /// Search recipes by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSearchHit>, RecipeApiError> {
        let data: SearchResults<RecipeSearchHit> = self
            .get("/recipes/complexSearch", &[("query", query.to_string())])
            .await?;
        Ok(data.results)
    }

    // =========================================================================
    // Ingredient Methods
    // =========================================================================

    /// Look up substitutes for an ingredient by name.
    ///
    /// A `"failure"` status is a normal response, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn ingredient_substitutes(
        &self,
        name: &str,
    ) -> Result<SubstitutesResponse, RecipeApiError> {
        self.get(
            "/food/ingredients/substitutes",
            &[("ingredientName", name.to_string())],
        )
        .await
    }

    /// Search ingredients by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_ingredients(&self, query: &str) -> Result<Vec<IngredientHit>, RecipeApiError> {
        let data: SearchResults<IngredientHit> = self
            .get("/food/ingredients/search", &[("query", query.to_string())])
            .await?;
        Ok(data.results)
    }

    /// Get name and image for an ingredient.
    ///
    /// # Errors
    ///
    /// Returns an error if the ingredient is not found or the API request fails.
    #[instrument(skip(self), fields(ingredient_id = %id))]
    pub async fn ingredient_information(
        &self,
        id: IngredientId,
    ) -> Result<IngredientInformation, RecipeApiError> {
        let cache_key = CacheKey::Ingredient(id);

        if let Some(CacheValue::Ingredient(info)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for ingredient");
            return Ok(info);
        }

        let info: IngredientInformation = self
            .get(&format!("/food/ingredients/{id}/information"), &[])
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Ingredient(info.clone()))
            .await;

        Ok(info)
    }
}
