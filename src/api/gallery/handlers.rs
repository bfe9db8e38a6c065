use crate::api::models::*;
use crate::storage::documents_to_json;
use axum::extract::State;
use mongodb::bson::Document;
use serde_json::Value;
use tracing::debug;

pub async fn list_gallery_handler(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    let items = state.gallery.find(Document::new()).await?;
    debug!(count = items.len(), "Listed gallery");
    Ok(Envelope::ok(documents_to_json(items)))
}
