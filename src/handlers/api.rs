use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    models::{posts::PostForm, response::Response},
    AppState, Result,
};

pub fn api_handler() -> Router {
    Router::new().route("/posts", get(get_posts).post(create_post))
}

async fn get_posts(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = app_state.store.fetch_all_posts().await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_post): Json<PostForm>,
) -> Result<impl IntoResponse> {
    new_post.validate()?;

    app_state
        .store
        .create_post(&new_post.title, &new_post.body, &new_post.author)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Response::success("Post created")),
    ))
}
