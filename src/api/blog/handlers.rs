use crate::api::models::*;
use crate::storage::documents_to_json;
use axum::extract::State;
use mongodb::bson::Document;
use serde_json::Value;
use tracing::debug;

pub async fn list_blogs_handler(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    let blogs = state.blogs.find(Document::new()).await?;
    debug!(count = blogs.len(), "Listed blogs");
    Ok(Envelope::ok(documents_to_json(blogs)))
}
