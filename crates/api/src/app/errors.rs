use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use larder_core::DomainError;
use larder_infra::{ConsumeError, StoreError};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        err @ DomainError::InsufficientQuantity { .. } => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_quantity", err.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "store backend failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn consume_error_to_response(err: ConsumeError) -> axum::response::Response {
    match err {
        ConsumeError::RecipeNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "recipe not found")
        }
        ConsumeError::ItemNotFound(item_id) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("item {item_id} not found"),
        ),
        ConsumeError::Store(e) => store_error_to_response(e),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
