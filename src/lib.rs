use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use self::config::Config;
pub use self::errors::{Error, Result, StoreAccessError};

use repositories::{MemoryRepo, PostStore, PostgresRepo};
use routes::create_routes;
use services::posts::PostController;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod views;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PostStore>,
    pub controller: Arc<PostController>,
}

/// Picks the post store named by `config`, running migrations for Postgres.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn PostStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        info!("DATABASE_URL not set, keeping posts in memory");
        return Ok(Arc::new(MemoryRepo::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    info!("connected to the database");

    let repo = PostgresRepo::new(pool);
    repo.migrate().await?;
    Ok(Arc::new(repo))
}

/// Mounts the blog view (running its initial load) and builds the router.
pub async fn build_app(config: Config, store: Arc<dyn PostStore>) -> Router {
    let controller = Arc::new(PostController::new(store.clone()));
    controller.mount().await;

    let app_state = AppState {
        config,
        store,
        controller,
    };
    create_routes(Arc::new(app_state))
}
