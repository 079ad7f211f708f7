use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{api::api_handler, posts::posts_handler},
    AppState,
};

pub fn create_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .merge(posts_handler())
        .nest("/api", api_handler())
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
