#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use bson::Document;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use zapshift::application::readiness::Readiness;
use zapshift::application::service::ShippingService;
use zapshift::domain::collection::Collection;
use zapshift::domain::document::{DocumentId, Query};
use zapshift::domain::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use zapshift::domain::payment::{CheckoutSession, CheckoutSessionRequest, CheckoutSettings};
use zapshift::domain::ports::{DocumentStore, PaymentProvider};
use zapshift::error::{Result, ShiftError};
use zapshift::infrastructure::in_memory::InMemoryDocumentStore;
use zapshift::interfaces::http::{AppState, router};

pub const CLIENT_URL: &str = "https://shift.example";
pub const SESSION_URL: &str = "https://checkout.stripe.test/c/pay/cs_test_1";

/// One call observed by `CountingStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    pub op: &'static str,
    pub collection: Collection,
    pub id: Option<DocumentId>,
}

/// In-memory store that records every call it receives.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryDocumentStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, collection: Collection, id: Option<DocumentId>) {
        self.calls.lock().unwrap().push(StoreCall { op, collection, id });
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }

    async fn find(&self, collection: Collection, query: Query) -> Result<Vec<Document>> {
        self.record("find", collection, None);
        self.inner.find(collection, query).await
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>> {
        self.record("find_by_id", collection, Some(id));
        self.inner.find_by_id(collection, id).await
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOutcome> {
        self.record("insert_one", collection, None);
        self.inner.insert_one(collection, document).await
    }

    async fn upsert_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Document,
    ) -> Result<UpdateOutcome> {
        self.record("upsert_by_id", collection, Some(id));
        self.inner.upsert_by_id(collection, id, fields).await
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteOutcome> {
        self.record("delete_by_id", collection, Some(id));
        self.inner.delete_by_id(collection, id).await
    }
}

/// Store whose backend is never reachable.
#[derive(Clone, Copy, Default)]
pub struct UnreachableStore;

fn unreachable_err<T>() -> Result<T> {
    Err(ShiftError::StoreUnavailable("connection refused".to_string()))
}

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn ping(&self) -> Result<()> {
        unreachable_err()
    }

    async fn find(&self, _: Collection, _: Query) -> Result<Vec<Document>> {
        unreachable_err()
    }

    async fn find_by_id(&self, _: Collection, _: DocumentId) -> Result<Option<Document>> {
        unreachable_err()
    }

    async fn insert_one(&self, _: Collection, _: Document) -> Result<InsertOutcome> {
        unreachable_err()
    }

    async fn upsert_by_id(&self, _: Collection, _: DocumentId, _: Document) -> Result<UpdateOutcome> {
        unreachable_err()
    }

    async fn delete_by_id(&self, _: Collection, _: DocumentId) -> Result<DeleteOutcome> {
        unreachable_err()
    }
}

/// Payment provider that records requests and answers with a fixed session.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    requests: Arc<Mutex<Vec<CheckoutSessionRequest>>>,
    reject_with: Option<String>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for RecordingProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reject_with {
            Some(message) => Err(ShiftError::ProviderRequestFailed(message.clone())),
            None => Ok(CheckoutSession {
                id: "cs_test_1".to_string(),
                url: SESSION_URL.to_string(),
            }),
        }
    }
}

pub fn checkout_settings() -> CheckoutSettings {
    CheckoutSettings {
        client_url: CLIENT_URL.to_string(),
        currency: "usd".to_string(),
    }
}

pub fn app_with<S, P>(store: S, provider: P, readiness: Readiness) -> Router
where
    S: DocumentStore + 'static,
    P: PaymentProvider + 'static,
{
    let service = ShippingService::new(Box::new(store), Box::new(provider), checkout_settings());
    router(AppState::new(Arc::new(service), readiness))
}

/// A ready router over `store` with a recording payment provider.
pub fn app(store: CountingStore) -> Router {
    app_with(store, RecordingProvider::new(), Readiness::ready())
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn with_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
