use crate::api::models::AppState;
use crate::api::service::handlers::*;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/services",
            get(list_services_handler).post(create_service_handler),
        )
        .route("/limitedservice", get(limited_services_handler))
        .route(
            "/service/{id}",
            get(get_service_handler)
                .put(update_service_handler)
                .delete(delete_service_handler),
        )
}
