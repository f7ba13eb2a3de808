//! In-memory stores for dev and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use larder_core::{DomainError, ItemId, RecipeId};
use larder_inventory::{Item, ItemPatch};
use larder_recipes::{Recipe, RecipeLine};

use crate::error::StoreError;
use crate::store::{ItemStore, RecipeStore};

/// In-memory item store backed by a `RwLock<HashMap>`.
///
/// Per-item mutations take the write lock for the whole read-modify-write, so
/// the same per-item atomicity holds as for the Postgres single-row UPDATEs.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::backend("store lock poisoned")
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert(&self, item: Item) -> Result<Item, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(item.id_typed(), item.clone());
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut items: Vec<Item> = map.values().cloned().collect();
        // Creation order, same as the Postgres backend's ORDER BY.
        items.sort_by_key(|i| (i.created_at(), *i.id_typed().as_uuid()));
        Ok(items)
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Option<Item>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(item) = map.get_mut(&id) else {
            return Ok(None);
        };
        item.apply_patch(patch, Utc::now())?;
        Ok(Some(item.clone()))
    }

    async fn increase(&self, id: ItemId, amount: i64) -> Result<Option<Item>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(item) = map.get_mut(&id) else {
            return Ok(None);
        };
        item.increase(amount, Utc::now());
        Ok(Some(item.clone()))
    }

    async fn decrease(&self, id: ItemId, amount: i64) -> Result<Item, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let item = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        item.decrease(amount, Utc::now())?;
        Ok(item.clone())
    }

    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Option<Item>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(item) = map.get_mut(&id) else {
            return Ok(None);
        };
        item.adjust(delta, Utc::now());
        Ok(Some(item.clone()))
    }
}

/// In-memory recipe store backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    inner: RwLock<HashMap<RecipeId, Recipe>>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn insert(&self, recipe: Recipe) -> Result<Recipe, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(recipe.id_typed(), recipe.clone());
        Ok(recipe)
    }

    async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut recipes: Vec<Recipe> = map.values().cloned().collect();
        recipes.sort_by_key(|r| (r.created_at(), *r.id_typed().as_uuid()));
        Ok(recipes)
    }

    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn replace(
        &self,
        id: RecipeId,
        name: String,
        lines: Vec<RecipeLine>,
    ) -> Result<Option<Recipe>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let Some(recipe) = map.get_mut(&id) else {
            return Ok(None);
        };
        recipe.replace(name, lines, Utc::now())?;
        Ok(Some(recipe.clone()))
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}
