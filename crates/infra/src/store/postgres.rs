//! Postgres-backed stores.
//!
//! Quantity mutations (`increase`, `decrease`, `adjust`) are single-row
//! `UPDATE ... RETURNING` statements, so per-item atomicity holds under
//! concurrent requests without any application-level locking. Nothing wraps
//! multiple items in one transaction; the consumption workflow inherits that
//! gap deliberately.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use larder_core::{DomainError, ItemId, RecipeId};
use larder_inventory::{Item, ItemPatch};
use larder_recipes::{Recipe, RecipeLine};

use crate::error::StoreError;
use crate::store::{ItemStore, RecipeStore};

/// Apply the schema (idempotent). Called once at startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(include_str!("../../migrations/0001_init.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

/// Postgres-backed item store.
#[derive(Debug, Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn item_from_row(row: &PgRow) -> Result<Item, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let quantity: i64 = row.try_get("quantity")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Item::from_parts(
        ItemId::from_uuid(id),
        name,
        quantity,
        created_at,
        updated_at,
    ))
}

const ITEM_COLUMNS: &str = "id, name, quantity, created_at, updated_at";

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn insert(&self, item: Item) -> Result<Item, StoreError> {
        sqlx::query(
            "INSERT INTO items (id, name, quantity, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(item.id_typed().as_uuid())
        .bind(item.name())
        .bind(item.quantity())
        .bind(item.created_at())
        .bind(item.updated_at())
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(item_from_row).collect()
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Option<Item>, StoreError> {
        // Read-modify-write so domain validation applies to the merged state.
        let Some(mut item) = self.get(id).await? else {
            return Ok(None);
        };
        item.apply_patch(patch, Utc::now())?;

        let row = sqlx::query(&format!(
            "UPDATE items SET name = $2, quantity = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(item.name())
        .bind(item.quantity())
        .bind(item.updated_at())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn increase(&self, id: ItemId, amount: i64) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE items SET quantity = quantity + $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn decrease(&self, id: ItemId, amount: i64) -> Result<Item, StoreError> {
        // Guard and subtract in one statement; `quantity > $2` keeps the
        // strict insufficient-stock rule race-free.
        let row = sqlx::query(&format!(
            "UPDATE items SET quantity = quantity - $2, updated_at = NOW() \
             WHERE id = $1 AND quantity > $2 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row.as_ref() {
            return item_from_row(row);
        }

        // Distinguish "missing" from "not enough stock".
        let available = sqlx::query("SELECT quantity FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        match available {
            Some(row) => {
                let available: i64 = row.try_get("quantity")?;
                Err(DomainError::insufficient(available, amount).into())
            }
            None => Err(DomainError::NotFound.into()),
        }
    }

    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE items SET quantity = quantity + $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(item_from_row).transpose()
    }
}

/// Postgres-backed recipe store. Lines are stored as a JSONB array, mirroring
/// the embedded-document shape of the original data model.
#[derive(Debug, Clone)]
pub struct PostgresRecipeStore {
    pool: PgPool,
}

impl PostgresRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn recipe_from_row(row: &PgRow) -> Result<Recipe, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let lines: serde_json::Value = row.try_get("lines")?;
    let lines: Vec<RecipeLine> = serde_json::from_value(lines)
        .map_err(|e| StoreError::backend(format!("malformed recipe lines: {e}")))?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Recipe::from_parts(
        RecipeId::from_uuid(id),
        name,
        lines,
        created_at,
        updated_at,
    ))
}

fn lines_to_json(lines: &[RecipeLine]) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(lines).map_err(|e| StoreError::backend(e.to_string()))
}

const RECIPE_COLUMNS: &str = "id, name, lines, created_at, updated_at";

#[async_trait]
impl RecipeStore for PostgresRecipeStore {
    async fn insert(&self, recipe: Recipe) -> Result<Recipe, StoreError> {
        sqlx::query(
            "INSERT INTO recipes (id, name, lines, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(recipe.id_typed().as_uuid())
        .bind(recipe.name())
        .bind(lines_to_json(recipe.lines())?)
        .bind(recipe.created_at())
        .bind(recipe.updated_at())
        .execute(&self.pool)
        .await?;
        Ok(recipe)
    }

    async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(recipe_from_row).collect()
    }

    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(recipe_from_row).transpose()
    }

    async fn replace(
        &self,
        id: RecipeId,
        name: String,
        lines: Vec<RecipeLine>,
    ) -> Result<Option<Recipe>, StoreError> {
        let Some(mut recipe) = self.get(id).await? else {
            return Ok(None);
        };
        recipe.replace(name, lines, Utc::now())?;

        let row = sqlx::query(&format!(
            "UPDATE recipes SET name = $2, lines = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(recipe.name())
        .bind(lines_to_json(recipe.lines())?)
        .bind(recipe.updated_at())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(recipe_from_row).transpose()
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
