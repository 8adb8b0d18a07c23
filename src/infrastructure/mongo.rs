use crate::domain::collection::Collection;
use crate::domain::document::{DocumentId, Query};
use crate::domain::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::ports::DocumentStore;
use crate::error::{Result, ShiftError};
use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{Client, Database};
use tracing::debug;

/// Document store backed by a MongoDB deployment.
///
/// Holds one `Client`; the driver pools connections internally, so clones of
/// this store are cheap and safe to share across requests.
#[derive(Clone)]
pub struct MongoDocumentStore {
    client: Client,
    database: Database,
}

impl MongoDocumentStore {
    /// Parses `uri` and prepares a client for `database`.
    ///
    /// The driver connects lazily, so an unreachable server only surfaces on
    /// the first operation (normally the readiness ping).
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database);
        Ok(Self { client, database })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection(collection.name())
    }
}

fn id_filter(id: DocumentId) -> Document {
    doc! { "_id": id.object_id() }
}

fn query_filter(query: Query) -> Document {
    match query {
        Query::All => Document::new(),
        Query::FieldEquals { field, value } => {
            let mut filter = Document::new();
            filter.insert(field, value);
            filter
        }
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn find(&self, collection: Collection, query: Query) -> Result<Vec<Document>> {
        let cursor = self.collection(collection).find(query_filter(query)).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(
            collection = collection.name(),
            count = documents.len(),
            "find"
        );
        Ok(documents)
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>> {
        Ok(self.collection(collection).find_one(id_filter(id)).await?)
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome> {
        let result = self.collection(collection).insert_one(document).await?;
        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(InsertOutcome::new(oid.into())),
            other => Err(ShiftError::StoreOperationFailed(format!(
                "store assigned a non-object identifier: {other}"
            ))),
        }
    }

    async fn upsert_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Document,
    ) -> Result<UpdateOutcome> {
        let result = self
            .collection(collection)
            .update_one(id_filter(id), doc! { "$set": fields })
            .upsert(true)
            .await?;

        Ok(match result.upserted_id {
            Some(_) => UpdateOutcome::upserted(id),
            None => UpdateOutcome {
                acknowledged: true,
                matched_count: result.matched_count,
                modified_count: result.modified_count,
                upserted_count: 0,
                upserted_id: None,
            },
        })
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteOutcome> {
        let result = self.collection(collection).delete_one(id_filter(id)).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }
}
