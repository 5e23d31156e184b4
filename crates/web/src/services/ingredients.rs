//! Ingredient labels and simulated prices.
//!
//! The recipe API has no prices, so ingredient search results are given a
//! random whole-cent price that the client sends back with its cart.

use std::collections::HashMap;

use futures::future::join_all;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::warn;

use sous_chef_core::IngredientId;

use crate::models::cart::IngredientLabel;
use crate::models::recipe::ingredient_image_url;
use crate::spoonacular::RecipeClient;

/// Lowest simulated price, in cents.
const MIN_PRICE_CENTS: i64 = 100;
/// Highest simulated price, in cents.
const MAX_PRICE_CENTS: i64 = 5_000;

/// Draw a price uniformly from 1.00 to 50.00 in whole cents.
pub fn simulated_price<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    Decimal::new(rng.random_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS), 2)
}

/// Which ingredient name to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelName {
    /// The canonical name (`name`).
    Canonical,
    /// The name as written in the source recipe (`originalName`), falling
    /// back to the canonical name.
    Original,
}

/// Look up display labels for a set of ingredients.
///
/// Each distinct ID is fetched once. A failed lookup is logged and replaced
/// with [`IngredientLabel::fallback`] so one bad ingredient never fails the
/// whole cart.
///
/// Takes the IDs by value: handler futures must be `Send`, so nothing
/// borrowed from the caller's orders may be held across the lookups.
pub async fn labels(
    client: &RecipeClient,
    mut unique: Vec<IngredientId>,
    which: LabelName,
) -> HashMap<IngredientId, IngredientLabel> {
    unique.sort_unstable();
    unique.dedup();

    let lookups = unique.iter().map(|&id| async move {
        let label = match client.ingredient_information(id).await {
            Ok(info) => IngredientLabel {
                name: match which {
                    LabelName::Original => info.original_name.unwrap_or(info.name),
                    LabelName::Canonical => info.name,
                },
                image: ingredient_image_url(info.image.as_deref()),
            },
            Err(e) => {
                warn!(ingredient_id = %id, error = %e, "Ingredient lookup failed, using fallback label");
                IngredientLabel::fallback(id)
            }
        };
        (id, label)
    });

    join_all(lookups).await.into_iter().collect()
}

/// Take the label for `id` out of a lookup map, or the fallback.
pub fn label_for(labels: &HashMap<IngredientId, IngredientLabel>, id: IngredientId) -> IngredientLabel {
    labels
        .get(&id)
        .cloned()
        .unwrap_or_else(|| IngredientLabel::fallback(id))
}
