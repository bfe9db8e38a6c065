use crate::api::blog::handlers::list_blogs_handler;
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs_handler))
}
