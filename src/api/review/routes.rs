use crate::api::models::AppState;
use crate::api::review::handlers::*;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reviews",
            get(list_reviews_handler).post(create_review_handler),
        )
        .route(
            "/review/{id}",
            get(service_reviews_handler)
                .put(update_review_handler)
                .delete(delete_review_handler),
        )
}
