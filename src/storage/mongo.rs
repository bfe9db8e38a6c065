use super::{
    DeleteAck, DocumentCollection, DocumentStore, InsertAck, StoreResult, UpdateAck,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use std::sync::Arc;
use tracing::info;

/// MongoDB-backed store. The client is opened once and shared by every collection.
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect with the Stable API v1 and ping the server
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let database = client.database(database);
        database.run_command(doc! { "ping": 1 }).await?;

        info!(database = %database.name(), "Connected to MongoDB");
        Ok(Self { database })
    }
}

impl DocumentStore for MongoStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection {
            inner: self.database.collection(name),
        })
    }
}

struct MongoCollection {
    inner: Collection<Document>,
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        let cursor = self.inner.find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.inner.find_one(filter).await?)
    }

    async fn insert_one(&self, document: Document) -> StoreResult<InsertAck> {
        let result = self.inner.insert_one(document).await?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    async fn update_one(
        &self,
        filter: Document,
        fields: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck> {
        let result = self
            .inner
            .update_one(filter, doc! { "$set": fields })
            .upsert(upsert)
            .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id,
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<DeleteAck> {
        let result = self.inner.delete_one(filter).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
