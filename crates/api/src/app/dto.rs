use axum::http::StatusCode;
use serde::Deserialize;

use larder_inventory::Item;
use larder_recipes::{Recipe, RecipeLine, ResolvedRecipe};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncreaseQuantityRequest {
    pub increase_by: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecreaseQuantityRequest {
    pub decrease_by: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLineRequest {
    pub item_id: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub items: Vec<RecipeLineRequest>,
}

/// Parse line requests into domain lines; a malformed item id yields a 400.
pub fn to_recipe_lines(
    req_lines: Vec<RecipeLineRequest>,
) -> Result<Vec<RecipeLine>, axum::response::Response> {
    let mut lines = Vec::with_capacity(req_lines.len());
    for l in req_lines {
        let item_id = match l.item_id.parse() {
            Ok(id) => id,
            Err(_) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    format!("invalid item id: {}", l.item_id),
                ))
            }
        };
        lines.push(RecipeLine {
            item_id,
            amount: l.amount,
        });
    }
    Ok(lines)
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn item_to_json(item: &Item) -> serde_json::Value {
    serde_json::json!({
        "id": item.id_typed().to_string(),
        "name": item.name(),
        "quantity": item.quantity(),
        "createdAt": item.created_at().to_rfc3339(),
        "updatedAt": item.updated_at().to_rfc3339(),
    })
}

/// Raw recipe shape (line item ids only) — used by the create response.
pub fn recipe_to_json(recipe: &Recipe) -> serde_json::Value {
    serde_json::json!({
        "id": recipe.id_typed().to_string(),
        "name": recipe.name(),
        "items": recipe.lines().iter().map(|l| serde_json::json!({
            "itemId": l.item_id.to_string(),
            "amount": l.amount,
        })).collect::<Vec<_>>(),
        "createdAt": recipe.created_at().to_rfc3339(),
        "updatedAt": recipe.updated_at().to_rfc3339(),
    })
}

/// Resolved recipe shape: each line carries the full item record, or `null`
/// when the reference is dangling.
pub fn resolved_recipe_to_json(recipe: &ResolvedRecipe) -> serde_json::Value {
    serde_json::json!({
        "id": recipe.id.to_string(),
        "name": recipe.name,
        "items": recipe.lines.iter().map(|l| serde_json::json!({
            "itemId": l.item_id.to_string(),
            "amount": l.amount,
            "item": l.item.as_ref().map(item_to_json),
        })).collect::<Vec<_>>(),
        "createdAt": recipe.created_at.to_rfc3339(),
        "updatedAt": recipe.updated_at.to_rfc3339(),
    })
}
