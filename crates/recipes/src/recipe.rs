use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, Entity, ItemId, RecipeId};
use larder_inventory::Item;

/// One requirement of a recipe: `amount` units of the item behind `item_id`.
///
/// `item_id` is a weak reference. It is not checked against the item store at
/// create/update time; a dangling reference only shows up when the recipe is
/// resolved or consumed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLine {
    pub item_id: ItemId,
    pub amount: i64,
}

/// A named bill of materials: an ordered list of item requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    id: RecipeId,
    name: String,
    lines: Vec<RecipeLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new recipe.
    ///
    /// The name is trimmed and must be non-empty; every line amount must be
    /// positive. Referenced item ids are NOT validated for existence.
    pub fn new(
        id: RecipeId,
        name: impl Into<String>,
        lines: Vec<RecipeLine>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = valid_name(name.into())?;
        valid_lines(&lines)?;
        Ok(Self {
            id,
            name,
            lines,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a recipe from stored fields without re-validating.
    pub fn from_parts(
        id: RecipeId,
        name: String,
        lines: Vec<RecipeLine>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            lines,
            created_at,
            updated_at,
        }
    }

    pub fn id_typed(&self) -> RecipeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[RecipeLine] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Full replace of name and lines (`PUT` semantics).
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        lines: Vec<RecipeLine>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let name = valid_name(name.into())?;
        valid_lines(&lines)?;
        self.name = name;
        self.lines = lines;
        self.updated_at = now;
        Ok(())
    }

    /// Join each line against a lookup of full item records.
    ///
    /// A line whose item is missing resolves to `item: None`; resolution never
    /// fails and preserves line order.
    pub fn resolve_with(&self, mut lookup: impl FnMut(ItemId) -> Option<Item>) -> ResolvedRecipe {
        ResolvedRecipe {
            id: self.id,
            name: self.name.clone(),
            lines: self
                .lines
                .iter()
                .map(|line| ResolvedLine {
                    item_id: line.item_id,
                    amount: line.amount,
                    item: lookup(line.item_id),
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Entity for Recipe {
    type Id = RecipeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A recipe line with its item reference resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    pub item_id: ItemId,
    pub amount: i64,
    /// `None` when the referenced item no longer exists.
    pub item: Option<Item>,
}

/// A recipe with every line's item reference resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub id: RecipeId,
    pub name: String,
    pub lines: Vec<ResolvedLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn valid_name(name: String) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn valid_lines(lines: &[RecipeLine]) -> DomainResult<()> {
    for line in lines {
        if line.amount <= 0 {
            return Err(DomainError::validation("line amount must be positive"));
        }
    }
    Ok(())
}
