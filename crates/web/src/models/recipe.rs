//! Recipe response types and the conversions from recipe API payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sous_chef_core::{IngredientId, Rating, RecipeId, ReviewId, UserId, Username};

use crate::spoonacular::{DietFilter, FoundRecipe, NutritionWidget, RecipeInformation};

/// Image used when the recipe API has none.
pub const DEFAULT_RECIPE_IMAGE: &str = "/static/images/def_img.png";

/// CDN prefix for ingredient thumbnails.
const INGREDIENT_IMAGE_BASE: &str = "https://spoonacular.com/cdn/ingredients_100x100/";

/// Full URL for an ingredient image file name.
#[must_use]
pub fn ingredient_image_url(image: Option<&str>) -> Option<String> {
    image
        .filter(|name| !name.is_empty())
        .map(|name| format!("{INGREDIENT_IMAGE_BASE}{name}"))
}

// =============================================================================
// Summaries
// =============================================================================

/// Diet attributes keyed by display label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeTags {
    #[serde(rename = "Vegetarian")]
    pub vegetarian: bool,
    #[serde(rename = "Vegan")]
    pub vegan: bool,
    #[serde(rename = "Gluten Free")]
    pub gluten_free: bool,
    #[serde(rename = "Dairy Free")]
    pub dairy_free: bool,
    #[serde(rename = "Very Healthy")]
    pub very_healthy: bool,
    #[serde(rename = "Cheap")]
    pub cheap: bool,
    #[serde(rename = "Very Popular")]
    pub very_popular: bool,
    #[serde(rename = "Sustainable")]
    pub sustainable: bool,
}

impl From<&RecipeInformation> for RecipeTags {
    fn from(info: &RecipeInformation) -> Self {
        Self {
            vegetarian: info.has(DietFilter::Vegetarian),
            vegan: info.has(DietFilter::Vegan),
            gluten_free: info.has(DietFilter::GlutenFree),
            dairy_free: info.has(DietFilter::DairyFree),
            very_healthy: info.has(DietFilter::VeryHealthy),
            cheap: info.has(DietFilter::Cheap),
            very_popular: info.has(DietFilter::VeryPopular),
            sustainable: info.has(DietFilter::Sustainable),
        }
    }
}

/// A recipe card.
///
/// `favorite` is only present when a user is signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub source_url: Option<String>,
    pub image: String,
    pub summary: String,
    pub tags: RecipeTags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl RecipeSummary {
    /// Set `favorite` from the user's favorite list, if there is a user.
    #[must_use]
    pub fn with_favorites(mut self, favorites: Option<&[RecipeId]>) -> Self {
        self.favorite = favorites.map(|ids| ids.contains(&self.id));
        self
    }
}

impl From<&RecipeInformation> for RecipeSummary {
    fn from(info: &RecipeInformation) -> Self {
        Self {
            id: info.id,
            title: info.title.clone(),
            source_url: info.source_url.clone(),
            image: info
                .image
                .clone()
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_RECIPE_IMAGE.to_string()),
            summary: info.summary.clone(),
            tags: RecipeTags::from(info),
            favorite: None,
        }
    }
}

/// A `findByIngredients` result, passed through with `favorite` added.
#[derive(Debug, Clone, Serialize)]
pub struct FoundRecipeView {
    #[serde(flatten)]
    pub recipe: FoundRecipe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl FoundRecipeView {
    #[must_use]
    pub fn new(recipe: FoundRecipe, favorites: Option<&[RecipeId]>) -> Self {
        let favorite = favorites.map(|ids| ids.contains(&recipe.id));
        Self { recipe, favorite }
    }
}

/// `POST /recipes/favorite` response body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FavoriteStatus {
    pub recipe_id: RecipeId,
    /// Whether the recipe is a favorite after the toggle.
    pub favorite: bool,
}

// =============================================================================
// Details
// =============================================================================

/// Whether a nutrient is one to seek out or to limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientRating {
    Good,
    Bad,
}

/// A nutrient entry, passed through with a `rating` added.
#[derive(Debug, Clone, Serialize)]
pub struct Nutrient {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub rating: NutrientRating,
}

/// Nutrition summary for a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct Nutrition {
    /// The digits of the calorie string (`"584k"` gives 584); `None` if there are none.
    pub calories: Option<u64>,
    /// Good nutrients first, then bad ones.
    pub nutrients: Vec<Nutrient>,
}

/// Keep only the ASCII digits of `raw` and parse them.
fn parse_calories(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

impl From<NutritionWidget> for Nutrition {
    fn from(widget: NutritionWidget) -> Self {
        let rate = |rating: NutrientRating| {
            move |mut fields: Map<String, Value>| {
                fields.remove("rating");
                Nutrient { fields, rating }
            }
        };

        let nutrients = widget
            .good
            .into_iter()
            .map(rate(NutrientRating::Good))
            .chain(widget.bad.into_iter().map(rate(NutrientRating::Bad)))
            .collect();

        Self {
            calories: parse_calories(&widget.calories),
            nutrients,
        }
    }
}

/// A review as shown on a recipe page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeReview {
    pub user_id: UserId,
    pub username: Username,
    pub profile_pic: String,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// `POST /recipes/{id}/reviews` response body.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedReview {
    pub id: ReviewId,
    pub recipe_id: RecipeId,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// Full recipe information.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub servings: Option<i32>,
    pub ready_in_minutes: Option<i32>,
    pub analyzed_instructions: Vec<Value>,
    pub extended_ingredients: Vec<Value>,
}

impl From<RecipeInformation> for RecipeDetail {
    fn from(info: RecipeInformation) -> Self {
        let summary = RecipeSummary::from(&info);
        Self {
            summary,
            servings: info.servings,
            ready_in_minutes: info.ready_in_minutes,
            analyzed_instructions: info.analyzed_instructions,
            extended_ingredients: info.extended_ingredients,
        }
    }
}

/// `GET /recipes/{id}` response body.
#[derive(Debug, Clone, Serialize)]
pub struct RecipePage {
    pub recipe: RecipeDetail,
    pub nutrition: Nutrition,
    pub reviews: Vec<RecipeReview>,
    /// The signed-in user's own review, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_review: Option<RecipeReview>,
}

// =============================================================================
// Ingredients
// =============================================================================

/// An ingredient search result with a simulated unit price.
#[derive(Debug, Clone, Serialize)]
pub struct PricedIngredient {
    pub id: IngredientId,
    pub name: String,
    pub image: Option<String>,
    pub price: rust_decimal::Decimal,
}

/// `GET /ingredients/substitutes` response body.
#[derive(Debug, Clone, Serialize)]
pub struct Substitutes {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,
    pub substitutes: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn info(json: &Value) -> RecipeInformation {
        serde_json::from_value(json.clone()).unwrap()
    }

    #[test]
    fn test_summary_defaults_image() {
        let recipe = info(&json!({"id": 1, "title": "Stew"}));
        let summary = RecipeSummary::from(&recipe);
        assert_eq!(summary.image, DEFAULT_RECIPE_IMAGE);

        let recipe = info(&json!({"id": 1, "title": "Stew", "image": "https://img/1.jpg"}));
        assert_eq!(RecipeSummary::from(&recipe).image, "https://img/1.jpg");
    }

    #[test]
    fn test_tags_serialize_with_labels() {
        let recipe = info(&json!({"id": 1, "title": "Salad", "vegan": true, "veryHealthy": true}));
        let tags = serde_json::to_value(RecipeTags::from(&recipe)).unwrap();

        assert_eq!(tags["Vegan"], true);
        assert_eq!(tags["Very Healthy"], true);
        assert_eq!(tags["Gluten Free"], false);
        assert_eq!(tags.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_favorite_only_present_with_user() {
        let recipe = info(&json!({"id": 5, "title": "Pie"}));

        let anonymous = RecipeSummary::from(&recipe).with_favorites(None);
        let out = serde_json::to_value(&anonymous).unwrap();
        assert!(out.get("favorite").is_none());

        let favorites = vec![RecipeId::new(5)];
        let signed_in = RecipeSummary::from(&recipe).with_favorites(Some(favorites.as_slice()));
        assert_eq!(signed_in.favorite, Some(true));

        let none: Vec<RecipeId> = Vec::new();
        let signed_in = RecipeSummary::from(&recipe).with_favorites(Some(none.as_slice()));
        assert_eq!(signed_in.favorite, Some(false));
    }

    #[test]
    fn test_found_recipe_view_flattens() {
        let found: FoundRecipe =
            serde_json::from_value(json!({"id": 3, "title": "Soup", "usedIngredientCount": 2}))
                .unwrap();
        let favorites = vec![RecipeId::new(3)];
        let out =
            serde_json::to_value(FoundRecipeView::new(found, Some(favorites.as_slice()))).unwrap();

        assert_eq!(out["id"], 3);
        assert_eq!(out["usedIngredientCount"], 2);
        assert_eq!(out["favorite"], true);
    }

    #[test]
    fn test_parse_calories() {
        assert_eq!(parse_calories("584k"), Some(584));
        assert_eq!(parse_calories("1,204 kcal"), Some(1204));
        assert_eq!(parse_calories("k"), None);
    }

    #[test]
    fn test_nutrition_orders_good_then_bad() {
        let widget: NutritionWidget = serde_json::from_value(json!({
            "calories": "316k",
            "good": [{"title": "Protein", "amount": "12g"}],
            "bad": [{"title": "Sugar", "amount": "30g"}, {"title": "Sodium", "amount": "1g"}]
        }))
        .unwrap();

        let nutrition = Nutrition::from(widget);
        assert_eq!(nutrition.calories, Some(316));

        let out = serde_json::to_value(&nutrition).unwrap();
        let nutrients = out["nutrients"].as_array().unwrap();
        assert_eq!(nutrients.len(), 3);
        assert_eq!(nutrients[0]["title"], "Protein");
        assert_eq!(nutrients[0]["rating"], "good");
        assert_eq!(nutrients[1]["rating"], "bad");
        assert_eq!(nutrients[2]["title"], "Sodium");
    }

    #[test]
    fn test_ingredient_image_url() {
        assert_eq!(
            ingredient_image_url(Some("apple.jpg")).as_deref(),
            Some("https://spoonacular.com/cdn/ingredients_100x100/apple.jpg")
        );
        assert_eq!(ingredient_image_url(Some("")), None);
        assert_eq!(ingredient_image_url(None), None);
    }
}
