//! Cache types for recipe API responses.

use sous_chef_core::{IngredientId, RecipeId};

use super::types::{IngredientInformation, NutritionWidget, RecipeInformation};

/// Cache key for lookups by ID.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Recipe(RecipeId),
    Nutrition(RecipeId),
    Ingredient(IngredientId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Recipe(Box<RecipeInformation>),
    Nutrition(Box<NutritionWidget>),
    Ingredient(IngredientInformation),
}
