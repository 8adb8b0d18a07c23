use super::collection::Collection;
use super::document::{DocumentId, Query};
use super::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use super::payment::{CheckoutSession, CheckoutSessionRequest};
use crate::error::Result;
use async_trait::async_trait;
use bson::Document;

/// Uniform access to the named document collections.
///
/// Every method is a single store round trip. Implementations must be safe to
/// share across concurrently running requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Confirms the backend is reachable.
    async fn ping(&self) -> Result<()>;
    async fn find(&self, collection: Collection, query: Query) -> Result<Vec<Document>>;
    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>>;
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome>;
    /// `$set`-merges `fields` into the document with `id`, creating
    /// `{_id: id, ..fields}` when none exists.
    async fn upsert_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Document,
    ) -> Result<UpdateOutcome>;
    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteOutcome>;
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession>;
}

pub type DocumentStoreBox = Box<dyn DocumentStore>;
pub type PaymentProviderBox = Box<dyn PaymentProvider>;
