pub mod document;
pub mod memory;
pub mod mongo;

pub use document::{
    document_to_json, documents_to_json, json_to_document, parse_object_id, pick_fields,
};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use std::sync::Arc;

pub const SERVICES: &str = "services";
pub const GALLERY: &str = "gallery";
pub const REVIEWS: &str = "reviews";
pub const BLOGS: &str = "blogs";

/// Storage layer errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid document id `{id}`: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("{0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Acknowledgment of a single-document insert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[serde(serialize_with = "document::serialize_bson")]
    pub inserted_id: Bson,
}

/// Acknowledgment of a single-document update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(serialize_with = "document::serialize_opt_bson")]
    pub upserted_id: Option<Bson>,
}

/// Acknowledgment of a single-document delete
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// One named collection of schemaless documents.
///
/// Filters are top-level field equality documents such as
/// `{ "_id": ObjectId(..) }` or `{ "email": "a@b.c" }`.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// All documents matching `filter`, in natural order
    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>>;

    /// First document matching `filter`
    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>>;

    /// Insert `document` as given, assigning an `_id` when it has none
    async fn insert_one(&self, document: Document) -> StoreResult<InsertAck>;

    /// `$set` the given fields on the first match, inserting when nothing
    /// matches and `upsert` is true
    async fn update_one(
        &self,
        filter: Document,
        fields: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck>;

    /// Remove at most one matching document
    async fn delete_one(&self, filter: Document) -> StoreResult<DeleteAck>;
}

/// A database handle that hands out collections by name
pub trait DocumentStore: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;
}
