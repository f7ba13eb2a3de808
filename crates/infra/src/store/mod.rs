//! Store abstractions over the two persisted collections.
//!
//! Handlers and the consumption workflow receive store handles explicitly
//! (`Arc<dyn ItemStore>` / `Arc<dyn RecipeStore>`); there is no process-wide
//! singleton. Two backends exist: an in-memory one for dev/tests and a
//! Postgres one for real deployments.

use async_trait::async_trait;

use larder_core::{ItemId, RecipeId};
use larder_inventory::{Item, ItemPatch};
use larder_recipes::{Recipe, RecipeLine};

use crate::error::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryItemStore, InMemoryRecipeStore};
pub use postgres::{PostgresItemStore, PostgresRecipeStore};

/// Persistence for stock items.
///
/// `Ok(None)` uniformly means "no item with that id". The guarded
/// [`ItemStore::decrease`] is the only operation with a business-rule failure
/// of its own ([`larder_core::DomainError::InsufficientQuantity`]); the
/// unguarded [`ItemStore::adjust`] is the consumption primitive and applies
/// its delta unconditionally.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert(&self, item: Item) -> Result<Item, StoreError>;

    async fn list(&self) -> Result<Vec<Item>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// Partial update; validation failures surface as `DomainError::Validation`.
    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Option<Item>, StoreError>;

    /// Add `amount` to the quantity. No upper bound.
    async fn increase(&self, id: ItemId, amount: i64) -> Result<Option<Item>, StoreError>;

    /// Guarded subtract: fails with `NotFound` or `InsufficientQuantity`
    /// (strict — the entire stock cannot be consumed), applied atomically
    /// per item.
    async fn decrease(&self, id: ItemId, amount: i64) -> Result<Item, StoreError>;

    /// Unguarded signed delta, applied atomically per item. May drive the
    /// quantity negative.
    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Option<Item>, StoreError>;
}

/// Persistence for recipes.
///
/// Line item ids are stored as opaque references; nothing here checks them
/// against the item store.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn insert(&self, recipe: Recipe) -> Result<Recipe, StoreError>;

    async fn list(&self) -> Result<Vec<Recipe>, StoreError>;

    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError>;

    /// Full replace of name and lines (`PUT` semantics).
    async fn replace(
        &self,
        id: RecipeId,
        name: String,
        lines: Vec<RecipeLine>,
    ) -> Result<Option<Recipe>, StoreError>;

    /// Returns `false` when no recipe with that id existed.
    async fn delete(&self, id: RecipeId) -> Result<bool, StoreError>;
}
