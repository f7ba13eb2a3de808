//! Recipe read-path resolution: join line item references to full records.

use std::collections::HashMap;

use larder_core::ItemId;
use larder_inventory::Item;
use larder_recipes::{Recipe, ResolvedRecipe};

use crate::error::StoreError;
use crate::store::ItemStore;

/// Resolve one recipe for display.
///
/// Missing items resolve to `None` on their line; resolution never aborts the
/// read. Only store-backend failures propagate.
pub async fn resolve_recipe(
    items: &dyn ItemStore,
    recipe: &Recipe,
) -> Result<ResolvedRecipe, StoreError> {
    let mut found: HashMap<ItemId, Option<Item>> = HashMap::new();
    for line in recipe.lines() {
        if !found.contains_key(&line.item_id) {
            found.insert(line.item_id, items.get(line.item_id).await?);
        }
    }
    Ok(recipe.resolve_with(|id| found.get(&id).cloned().flatten()))
}

/// Resolve a batch of recipes (the list endpoint).
pub async fn resolve_recipes(
    items: &dyn ItemStore,
    recipes: &[Recipe],
) -> Result<Vec<ResolvedRecipe>, StoreError> {
    let mut resolved = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        resolved.push(resolve_recipe(items, recipe).await?);
    }
    Ok(resolved)
}
