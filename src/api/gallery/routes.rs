use crate::api::gallery::handlers::list_gallery_handler;
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(list_gallery_handler))
}
