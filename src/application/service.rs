use crate::domain::collection::Collection;
use crate::domain::document::{self, DocumentId, Query};
use crate::domain::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::parcel::{self, ParcelFields};
use crate::domain::payment::{
    CheckoutRequest, CheckoutResponse, CheckoutSessionRequest, CheckoutSettings,
};
use crate::domain::ports::{DocumentStoreBox, PaymentProviderBox};
use crate::error::Result;
use serde_json::Value;
use tracing::info;

/// Application entry point behind every route.
///
/// `ShippingService` owns the document store and the payment provider. Each
/// method validates its input first and then issues at most one call to
/// either port, so a rejected request never reaches a backend.
pub struct ShippingService {
    store: DocumentStoreBox,
    payments: PaymentProviderBox,
    checkout: CheckoutSettings,
}

impl ShippingService {
    /// Creates a new `ShippingService`.
    ///
    /// # Arguments
    ///
    /// * `store` - Backend for the parcels, coverage and books collections.
    /// * `payments` - Provider that issues checkout sessions.
    /// * `checkout` - Redirect base URL and currency for checkout sessions.
    pub fn new(
        store: DocumentStoreBox,
        payments: PaymentProviderBox,
        checkout: CheckoutSettings,
    ) -> Self {
        Self {
            store,
            payments,
            checkout,
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub async fn list_books(&self) -> Result<Vec<Value>> {
        self.list(Collection::Books, Query::All).await
    }

    pub async fn get_book(&self, raw_id: &str) -> Result<Option<Value>> {
        self.get(Collection::Books, raw_id).await
    }

    pub async fn list_coverage(&self) -> Result<Vec<Value>> {
        self.list(Collection::Coverage, Query::All).await
    }

    /// Stores a new parcel with `createdAt` set to the current server time.
    pub async fn create_parcel(&self, body: Value) -> Result<InsertOutcome> {
        let fields = ParcelFields::from_json(body)?;
        let outcome = self
            .store
            .insert_one(Collection::Parcels, fields.stamped(bson::DateTime::now()))
            .await?;
        info!(parcel_id = %outcome.inserted_id, "parcel created");
        Ok(outcome)
    }

    /// Lists parcels, restricted to those whose `email` equals `email` when
    /// one is given.
    pub async fn list_parcels(&self, email: Option<&str>) -> Result<Vec<Value>> {
        self.list(Collection::Parcels, parcel::listing_query(email))
            .await
    }

    pub async fn get_parcel(&self, raw_id: &str) -> Result<Option<Value>> {
        self.get(Collection::Parcels, raw_id).await
    }

    /// Deletes a parcel; deleting a missing parcel reports a count of zero.
    pub async fn delete_parcel(&self, raw_id: &str) -> Result<DeleteOutcome> {
        let id = DocumentId::parse(raw_id)?;
        let outcome = self.store.delete_by_id(Collection::Parcels, id).await?;
        info!(parcel_id = %id, deleted = outcome.deleted_count, "parcel delete");
        Ok(outcome)
    }

    /// Merges the submitted fields into a parcel, creating it when no parcel
    /// with that identifier exists.
    pub async fn update_parcel(&self, raw_id: &str, body: Value) -> Result<UpdateOutcome> {
        let id = DocumentId::parse(raw_id)?;
        let fields = ParcelFields::from_update_json(body)?;
        let outcome = self
            .store
            .upsert_by_id(Collection::Parcels, id, fields.into_document())
            .await?;
        info!(
            parcel_id = %id,
            matched = outcome.matched_count,
            upserted = outcome.upserted_count,
            "parcel update"
        );
        Ok(outcome)
    }

    /// Opens a provider checkout session for a parcel and returns its URL.
    pub async fn start_checkout(&self, body: Value) -> Result<CheckoutResponse> {
        let request = CheckoutRequest::from_json(body)?;
        let parcel_id = request.parcel_id.clone();
        let session_request = CheckoutSessionRequest::build(request, &self.checkout)?;

        let session = self
            .payments
            .create_checkout_session(&session_request)
            .await?;
        info!(
            session_id = %session.id,
            %parcel_id,
            amount = session_request.line_item.unit_amount,
            "checkout session created"
        );

        Ok(CheckoutResponse { url: session.url })
    }

    async fn list(&self, collection: Collection, query: Query) -> Result<Vec<Value>> {
        let documents = self.store.find(collection, query).await?;
        Ok(documents.into_iter().map(document::to_json).collect())
    }

    async fn get(&self, collection: Collection, raw_id: &str) -> Result<Option<Value>> {
        let id = DocumentId::parse(raw_id)?;
        let found = self.store.find_by_id(collection, id).await?;
        Ok(found.map(document::to_json))
    }
}
