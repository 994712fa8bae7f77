use std::sync::Arc;

use axum::Router;
use sales_insights_api::{
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    AppState,
};

/// Fresh in-memory SQLite pool with the schema applied. A single
/// connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Arc<DbPool> {
    let cfg = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&cfg)
        .await
        .expect("Failed to create test DB pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Arc::new(pool)
}

#[allow(dead_code)]
pub async fn setup_test_state() -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, AppConfig::default())
}

#[allow(dead_code)]
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", sales_insights_api::api_v1_routes())
        .with_state(state)
}
