//! Recipe consumption: decrement every item a recipe requires.
//!
//! This is the one multi-step operation in the system. It deliberately has
//! **no transaction boundary across items**: each line is decremented by an
//! independent single-item adjust, and a failure partway through leaves
//! earlier decrements in place. The decrement is the unguarded primitive, so
//! quantities can go negative here even though the guarded single-item
//! decrease endpoint refuses that.

use std::sync::Arc;

use thiserror::Error;

use larder_core::{ItemId, RecipeId};

use crate::error::StoreError;
use crate::store::{ItemStore, RecipeStore};

/// Failure modes of [`ConsumptionWorkflow::consume`].
#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error("recipe not found")]
    RecipeNotFound,

    /// A referenced item was missing. Lines processed before this one have
    /// already been decremented and are not rolled back.
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the recipe-consumption pipeline over injected store handles.
pub struct ConsumptionWorkflow {
    items: Arc<dyn ItemStore>,
    recipes: Arc<dyn RecipeStore>,
}

impl ConsumptionWorkflow {
    pub fn new(items: Arc<dyn ItemStore>, recipes: Arc<dyn RecipeStore>) -> Self {
        Self { items, recipes }
    }

    /// Consume a recipe: decrement each required item by its line amount, in
    /// line order.
    ///
    /// Not idempotent — consuming twice deducts twice. No retries.
    pub async fn consume(&self, recipe_id: RecipeId) -> Result<(), ConsumeError> {
        let recipe = self
            .recipes
            .get(recipe_id)
            .await?
            .ok_or(ConsumeError::RecipeNotFound)?;

        for line in recipe.lines() {
            match self.items.adjust(line.item_id, -line.amount).await? {
                Some(item) => {
                    tracing::info!(
                        recipe_id = %recipe_id,
                        item_id = %line.item_id,
                        amount = line.amount,
                        remaining = item.quantity(),
                        "consumed recipe line"
                    );
                }
                None => {
                    tracing::warn!(
                        recipe_id = %recipe_id,
                        item_id = %line.item_id,
                        "consumption aborted: referenced item missing"
                    );
                    return Err(ConsumeError::ItemNotFound(line.item_id));
                }
            }
        }

        Ok(())
    }
}
