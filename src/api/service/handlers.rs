use crate::api::models::*;
use crate::storage::{
    document_to_json, documents_to_json, json_to_document, parse_object_id, pick_fields,
    DeleteAck, InsertAck, UpdateAck,
};
use axum::extract::{Path, State};
use mongodb::bson::{doc, Document};
use serde_json::Value;
use tracing::{debug, info};

/// Services returned by `GET /limitedservice`
pub const LIMITED_SERVICE_COUNT: usize = 4;

/// Fields an update may touch; anything else in the body is dropped
pub const SERVICE_FIELDS: [&str; 5] = ["title", "description", "icon", "image", "details"];

pub async fn list_services_handler(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    let services = state.services.find(Document::new()).await?;
    debug!(count = services.len(), "Listed services");
    Ok(Envelope::ok(documents_to_json(services)))
}

pub async fn limited_services_handler(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    // Truncated after a full read, not limited in the query
    let mut services = state.services.find(Document::new()).await?;
    services.truncate(LIMITED_SERVICE_COUNT);
    Ok(Envelope::ok(documents_to_json(services)))
}

pub async fn get_service_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<Value>> {
    let id = parse_object_id(&id)?;
    let service = state.services.find_one(doc! { "_id": id }).await?;
    debug!(%id, found = service.is_some(), "Fetched service");
    Ok(Envelope::ok(service.map(document_to_json)))
}

pub async fn create_service_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<InsertAck> {
    let service = json_to_document(body)?;
    let ack = state.services.insert_one(service).await?;
    info!(id = %ack.inserted_id, "Service created");
    Ok(Envelope::ok(ack))
}

pub async fn update_service_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<UpdateAck> {
    let id = parse_object_id(&id)?;
    let fields = pick_fields(&json_to_document(body)?, &SERVICE_FIELDS);

    let ack = state
        .services
        .update_one(doc! { "_id": id }, fields, true)
        .await?;

    info!(
        %id,
        matched = ack.matched_count,
        upserted = ack.upserted_count,
        "Service updated"
    );
    Ok(Envelope::ok(ack))
}

pub async fn delete_service_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteAck> {
    let id = parse_object_id(&id)?;
    let ack = state.services.delete_one(doc! { "_id": id }).await?;
    info!(%id, deleted = ack.deleted_count, "Service deleted");
    Ok(Envelope::ok(ack))
}
