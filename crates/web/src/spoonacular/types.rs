//! Recipe API wire types.
//!
//! Only the fields the application reads are modelled. Fields that are passed
//! through to clients untouched (instructions, extended ingredients, nutrients)
//! stay as `serde_json` values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sous_chef_core::{IngredientId, RecipeId};

// =============================================================================
// Diet Filters
// =============================================================================

/// A diet/attribute tag accepted by the random-recipe endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DietFilter {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    VeryHealthy,
    Cheap,
    VeryPopular,
    Sustainable,
}

impl DietFilter {
    /// Every filter, in display order.
    pub const ALL: [Self; 8] = [
        Self::Vegetarian,
        Self::Vegan,
        Self::GlutenFree,
        Self::DairyFree,
        Self::VeryHealthy,
        Self::Cheap,
        Self::VeryPopular,
        Self::Sustainable,
    ];

    /// The tag as sent to the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "glutenFree",
            Self::DairyFree => "dairyFree",
            Self::VeryHealthy => "veryHealthy",
            Self::Cheap => "cheap",
            Self::VeryPopular => "veryPopular",
            Self::Sustainable => "sustainable",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::GlutenFree => "Gluten Free",
            Self::DairyFree => "Dairy Free",
            Self::VeryHealthy => "Very Healthy",
            Self::Cheap => "Cheap",
            Self::VeryPopular => "Very Popular",
            Self::Sustainable => "Sustainable",
        }
    }
}

impl fmt::Display for DietFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised diet filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diet filter '{0}'")]
pub struct UnknownDietFilter(pub String);

impl FromStr for DietFilter {
    type Err = UnknownDietFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownDietFilter(s.to_string()))
    }
}

/// Parse a comma-separated filter list, ignoring blank entries and duplicates.
///
/// # Errors
///
/// Returns [`UnknownDietFilter`] for the first unrecognised tag.
pub fn parse_diet_filters(raw: &str) -> Result<Vec<DietFilter>, UnknownDietFilter> {
    let mut filters = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let filter = tag.parse::<DietFilter>()?;
        if !filters.contains(&filter) {
            filters.push(filter);
        }
    }
    Ok(filters)
}

// =============================================================================
// Recipes
// =============================================================================

/// `GET /recipes/{id}/information` (also the element type of random recipes).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInformation {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub ready_in_minutes: Option<i32>,
    #[serde(default)]
    pub analyzed_instructions: Vec<Value>,
    #[serde(default)]
    pub extended_ingredients: Vec<Value>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub dairy_free: bool,
    #[serde(default)]
    pub very_healthy: bool,
    #[serde(default)]
    pub cheap: bool,
    #[serde(default)]
    pub very_popular: bool,
    #[serde(default)]
    pub sustainable: bool,
}

impl RecipeInformation {
    /// Whether the recipe carries the given attribute.
    #[must_use]
    pub const fn has(&self, filter: DietFilter) -> bool {
        match filter {
            DietFilter::Vegetarian => self.vegetarian,
            DietFilter::Vegan => self.vegan,
            DietFilter::GlutenFree => self.gluten_free,
            DietFilter::DairyFree => self.dairy_free,
            DietFilter::VeryHealthy => self.very_healthy,
            DietFilter::Cheap => self.cheap,
            DietFilter::VeryPopular => self.very_popular,
            DietFilter::Sustainable => self.sustainable,
        }
    }
}

/// `GET /recipes/random`
#[derive(Debug, Clone, Deserialize)]
pub struct RandomRecipes {
    pub recipes: Vec<RecipeInformation>,
}

/// `GET /recipes/{id}/nutritionWidget.json`
#[derive(Debug, Clone, Deserialize)]
pub struct NutritionWidget {
    /// e.g. `"584k"`
    pub calories: String,
    #[serde(default)]
    pub good: Vec<Map<String, Value>>,
    #[serde(default)]
    pub bad: Vec<Map<String, Value>>,
}

/// One result of `GET /recipes/findByIngredients`.
///
/// Everything other than the ID is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundRecipe {
    pub id: RecipeId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One result of `GET /recipes/complexSearch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSearchHit {
    pub id: RecipeId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Envelope for the search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults<T> {
    pub results: Vec<T>,
}

// =============================================================================
// Ingredients
// =============================================================================

/// `GET /food/ingredients/substitutes`
#[derive(Debug, Clone, Deserialize)]
pub struct SubstitutesResponse {
    /// `"success"` or `"failure"`
    pub status: String,
    #[serde(default)]
    pub ingredient: Option<String>,
    #[serde(default)]
    pub substitutes: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubstitutesResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// One result of `GET /food/ingredients/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientHit {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// `GET /food/ingredients/{id}/information`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInformation {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_diet_filter_round_trips_through_str() {
        for filter in DietFilter::ALL {
            assert_eq!(filter.as_str().parse::<DietFilter>().unwrap(), filter);
        }
    }

    #[test]
    fn test_parse_diet_filters() {
        let filters = parse_diet_filters("vegan, cheap,,vegan").unwrap();
        assert_eq!(filters, vec![DietFilter::Vegan, DietFilter::Cheap]);

        assert!(parse_diet_filters("").unwrap().is_empty());

        let err = parse_diet_filters("vegan,keto").unwrap_err();
        assert_eq!(err, UnknownDietFilter("keto".to_string()));
    }

    #[test]
    fn test_recipe_information_defaults_missing_fields() {
        let json = r#"{"id": 716429, "title": "Pasta", "glutenFree": true}"#;
        let recipe: RecipeInformation = serde_json::from_str(json).unwrap();

        assert_eq!(recipe.id, RecipeId::new(716_429));
        assert!(recipe.image.is_none());
        assert!(recipe.has(DietFilter::GlutenFree));
        assert!(!recipe.has(DietFilter::Vegan));
        assert!(recipe.extended_ingredients.is_empty());
    }

    #[test]
    fn test_found_recipe_passes_fields_through() {
        let json = r#"{"id": 7, "title": "Toast", "missedIngredientCount": 2}"#;
        let found: FoundRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(found.id, RecipeId::new(7));

        let out = serde_json::to_value(&found).unwrap();
        assert_eq!(out["missedIngredientCount"], 2);
        assert_eq!(out["title"], "Toast");
    }

    #[test]
    fn test_substitutes_failure_shape() {
        let json = r#"{"status": "failure", "message": "Could not find any substitutes"}"#;
        let subs: SubstitutesResponse = serde_json::from_str(json).unwrap();
        assert!(!subs.is_success());
        assert!(subs.substitutes.is_empty());
    }
}
