use crate::api::models::*;
use crate::storage::{
    documents_to_json, json_to_document, parse_object_id, pick_fields, DeleteAck, InsertAck,
    UpdateAck,
};
use axum::extract::{Path, State};
use mongodb::bson::{doc, Document};
use serde_json::Value;
use tracing::{debug, info};

/// Only the review text is editable
pub const REVIEW_FIELDS: [&str; 1] = ["review"];

pub async fn list_reviews_handler(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ReviewQuery>,
) -> ApiResult<Vec<Value>> {
    // An empty email means no filter
    let filter = match query.email.filter(|email| !email.is_empty()) {
        Some(email) => doc! { "email": email },
        None => Document::new(),
    };

    let reviews = state.reviews.find(filter).await?;
    debug!(count = reviews.len(), "Listed reviews");
    Ok(Envelope::ok(documents_to_json(reviews)))
}

/// Reviews whose `serviceId` equals the path segment, compared as a plain string
pub async fn service_reviews_handler(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> ApiResult<Vec<Value>> {
    let reviews = state
        .reviews
        .find(doc! { "serviceId": service_id.as_str() })
        .await?;
    debug!(%service_id, count = reviews.len(), "Listed service reviews");
    Ok(Envelope::ok(documents_to_json(reviews)))
}

pub async fn create_review_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<InsertAck> {
    let review = json_to_document(body)?;
    let ack = state.reviews.insert_one(review).await?;
    info!(id = %ack.inserted_id, "Review added");
    Ok(Envelope::ok(ack))
}

pub async fn update_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<UpdateAck> {
    let id = parse_object_id(&id)?;
    let fields = pick_fields(&json_to_document(body)?, &REVIEW_FIELDS);

    let ack = state
        .reviews
        .update_one(doc! { "_id": id }, fields, true)
        .await?;

    info!(%id, matched = ack.matched_count, upserted = ack.upserted_count, "Review updated");
    Ok(Envelope::ok(ack))
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteAck> {
    let id = parse_object_id(&id)?;
    let ack = state.reviews.delete_one(doc! { "_id": id }).await?;
    info!(%id, deleted = ack.deleted_count, "Review deleted");
    Ok(Envelope::ok(ack))
}
