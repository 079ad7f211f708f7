use std::sync::Arc;

use axum::{
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use tracing::debug;

use crate::{models::posts::PostForm, views::render_page, AppState, Result};

pub fn posts_handler() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/form/toggle", post(toggle_form))
        .route("/posts", post(submit_post))
}

async fn index(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let state = app_state.controller.snapshot();
    let page = render_page(&state)?;
    Ok(Html(page))
}

async fn toggle_form(
    Extension(app_state): Extension<Arc<AppState>>,
    Form(draft): Form<PostForm>,
) -> Redirect {
    app_state.controller.toggle_form(draft);
    Redirect::to("/")
}

async fn submit_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Form(new_post): Form<PostForm>,
) -> Redirect {
    let outcome = app_state.controller.submit(new_post).await;
    debug!(?outcome, "post form submitted");
    Redirect::to("/")
}
