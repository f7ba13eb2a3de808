use std::sync::Arc;

use larder_api::app::{self, services::AppServices};

#[tokio::main]
async fn main() {
    larder_observability::init();

    let addr = std::env::var("LARDER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let services = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::PgPool::connect(&url)
                .await
                .expect("failed to connect to postgres");
            let services = AppServices::postgres(pool)
                .await
                .expect("failed to apply database schema");
            tracing::info!("using postgres stores");
            Arc::new(services)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Arc::new(AppServices::in_memory())
        }
    };

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
