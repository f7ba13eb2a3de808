use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;

use larder_core::RecipeId;
use larder_infra::resolve::{resolve_recipe, resolve_recipes};
use larder_infra::RecipeStore;
use larder_recipes::Recipe;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:recipe_id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/decrease-items/:recipe_id", put(consume_recipe))
}

pub async fn create_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateRecipeRequest>,
) -> axum::response::Response {
    let lines = match dto::to_recipe_lines(body.items) {
        Ok(lines) => lines,
        Err(resp) => return resp,
    };

    // Item ids are deliberately not checked for existence here; dangling
    // references surface at resolution/consumption time.
    let recipe = match Recipe::new(RecipeId::new(), body.name, lines, Utc::now()) {
        Ok(recipe) => recipe,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.recipes().insert(recipe).await {
        Ok(recipe) => (StatusCode::CREATED, Json(dto::recipe_to_json(&recipe))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_recipes(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let recipes = match services.recipes().list().await {
        Ok(recipes) => recipes,
        Err(e) => return errors::store_error_to_response(e),
    };

    match resolve_recipes(services.items(), &recipes).await {
        Ok(resolved) => {
            let body: Vec<_> = resolved.iter().map(dto::resolved_recipe_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecipeId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid recipe id")
        }
    };

    let recipe = match services.recipes().get(id).await {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "recipe not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    match resolve_recipe(services.items(), &recipe).await {
        Ok(resolved) => {
            (StatusCode::OK, Json(dto::resolved_recipe_to_json(&resolved))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateRecipeRequest>,
) -> axum::response::Response {
    let id: RecipeId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid recipe id")
        }
    };

    let lines = match dto::to_recipe_lines(body.items) {
        Ok(lines) => lines,
        Err(resp) => return resp,
    };

    let recipe = match services.recipes().replace(id, body.name, lines).await {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "recipe not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    match resolve_recipe(services.items(), &recipe).await {
        Ok(resolved) => {
            (StatusCode::OK, Json(dto::resolved_recipe_to_json(&resolved))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecipeId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid recipe id")
        }
    };

    match services.recipes().delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "recipe deleted" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "recipe not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn consume_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecipeId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid recipe id")
        }
    };

    match services.consumption().consume(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "items quantity decreased successfully" })),
        )
            .into_response(),
        Err(e) => errors::consume_error_to_response(e),
    }
}
