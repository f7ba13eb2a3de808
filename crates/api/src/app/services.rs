//! Store wiring for the HTTP layer.

use std::sync::Arc;

use sqlx::PgPool;

use larder_infra::store::postgres::ensure_schema;
use larder_infra::{
    ConsumptionWorkflow, InMemoryItemStore, InMemoryRecipeStore, ItemStore, PostgresItemStore,
    PostgresRecipeStore, RecipeStore, StoreError,
};

/// Handles every request handler needs: the two stores plus the consumption
/// workflow built over them. Injected via `Extension<Arc<AppServices>>`; no
/// process-wide singletons.
pub struct AppServices {
    items: Arc<dyn ItemStore>,
    recipes: Arc<dyn RecipeStore>,
    consumption: ConsumptionWorkflow,
}

impl AppServices {
    fn new(items: Arc<dyn ItemStore>, recipes: Arc<dyn RecipeStore>) -> Self {
        let consumption = ConsumptionWorkflow::new(items.clone(), recipes.clone());
        Self {
            items,
            recipes,
            consumption,
        }
    }

    /// In-memory stores, for dev and tests.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryItemStore::new()),
            Arc::new(InMemoryRecipeStore::new()),
        )
    }

    /// Postgres-backed stores; applies the schema before serving.
    pub async fn postgres(pool: PgPool) -> Result<Self, StoreError> {
        ensure_schema(&pool).await?;
        Ok(Self::new(
            Arc::new(PostgresItemStore::new(pool.clone())),
            Arc::new(PostgresRecipeStore::new(pool)),
        ))
    }

    pub fn items(&self) -> &dyn ItemStore {
        self.items.as_ref()
    }

    pub fn recipes(&self) -> &dyn RecipeStore {
        self.recipes.as_ref()
    }

    pub fn consumption(&self) -> &ConsumptionWorkflow {
        &self.consumption
    }
}
