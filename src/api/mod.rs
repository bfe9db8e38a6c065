pub mod blog;
pub mod gallery;
pub mod models;
pub mod review;
pub mod service;


// Re-exports
pub use models::*;

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, normalize_path::NormalizePath,
    normalize_path::NormalizePathLayer, trace::TraceLayer,
};

/// The served application: routing runs after trailing slashes are trimmed
pub type App = NormalizePath<Router>;

/// Build the full application router around `state`
pub fn router(state: AppState) -> App {
    let router = Router::new()
        .route("/", get(root_handler))
        .merge(service::routes())
        .merge(gallery::routes())
        .merge(review::routes())
        .merge(blog::routes())
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // `/services/` and `/services` route the same way
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

// Liveness (simple, keep here)
pub async fn root_handler() -> &'static str {
    "PetForce server is running..."
}

pub async fn not_found_handler(method: Method, uri: Uri) -> Response {
    let message = format!("Cannot {} {}", method, uri.path());
    (StatusCode::NOT_FOUND, Envelope::failure(message)).into_response()
}

fn panic_handler(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
