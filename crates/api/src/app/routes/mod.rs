use axum::{routing::get, Router};

pub mod items;
pub mod recipes;
pub mod system;

/// Router for the whole HTTP surface.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(items::router())
        .merge(recipes::router())
}
