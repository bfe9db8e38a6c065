use super::{
    DeleteAck, DocumentCollection, DocumentStore, InsertAck, StoreError, StoreResult, UpdateAck,
};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

/// In-process document store. Collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::new(name)));
        collection.clone()
    }
}

pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            documents: RwLock::new(Vec::new()),
        }
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Put `_id` first, generating one when missing
fn with_id(document: Document) -> (Bson, Document) {
    let id = document
        .get("_id")
        .cloned()
        .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

    let mut stored = Document::new();
    stored.insert("_id", id.clone());
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    (id, stored)
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|doc| matches(doc, &filter)).cloned())
    }

    async fn insert_one(&self, document: Document) -> StoreResult<InsertAck> {
        let (id, stored) = with_id(document);
        let mut documents = self.documents.write().await;

        if documents.iter().any(|doc| doc.get("_id") == Some(&id)) {
            return Err(StoreError::Backend(format!(
                "E11000 duplicate key error collection: {} index: _id_ dup key: {}",
                self.name, id
            )));
        }

        documents.push(stored);
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        filter: Document,
        fields: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck> {
        let mut documents = self.documents.write().await;

        if let Some(existing) = documents.iter_mut().find(|doc| matches(doc, &filter)) {
            let mut modified = false;
            for (key, value) in fields {
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            });
        }

        // Equality fields from the filter seed the new document
        let mut seed = filter;
        for (key, value) in fields {
            seed.insert(key, value);
        }
        let (id, stored) = with_id(seed);
        documents.push(stored);

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<DeleteAck> {
        let mut documents = self.documents.write().await;
        let deleted_count = match documents.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                documents.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
        })
    }
}
