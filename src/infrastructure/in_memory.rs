use crate::domain::collection::Collection;
use crate::domain::document::{DocumentId, ID_FIELD, Query};
use crate::domain::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::ports::DocumentStore;
use crate::error::Result;
use async_trait::async_trait;
use bson::Document;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Documents of one collection in insertion order.
type Documents = Vec<(DocumentId, Document)>;

/// A thread-safe in-memory document store.
///
/// Uses `Arc<RwLock<HashMap<Collection, _>>>` so clones share the same data.
/// Serves as the default backend when no database URI is configured and as the
/// store behind the router tests.
#[derive(Default, Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Documents>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts documents as-is, generating `_id` where it is missing or not
    /// an object identifier. Meant for seeding read-only collections.
    pub async fn seed(&self, collection: Collection, documents: Vec<Document>) {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection).or_default();
        for mut document in documents {
            let id = match document.get_object_id(ID_FIELD) {
                Ok(oid) => DocumentId::from(oid),
                Err(_) => {
                    let id = DocumentId::generate();
                    document.insert(ID_FIELD, id.object_id());
                    id
                }
            };
            entries.push((id, document));
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find(&self, collection: Collection, query: Query) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|(_, document)| query.matches(document))
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|entries| entries.iter().find(|(key, _)| *key == id))
            .map(|(_, document)| document.clone()))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOutcome> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD, id.object_id());

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push((id, document));
        Ok(InsertOutcome::new(id))
    }

    async fn upsert_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Document,
    ) -> Result<UpdateOutcome> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection).or_default();

        if let Some((_, existing)) = entries.iter_mut().find(|(key, _)| *key == id) {
            let mut modified = false;
            for (key, value) in fields {
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateOutcome::matched(modified));
        }

        let mut document = Document::new();
        document.insert(ID_FIELD, id.object_id());
        document.extend(fields);
        entries.push((id, document));
        Ok(UpdateOutcome::upserted(id))
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteOutcome> {
        let mut collections = self.collections.write().await;
        let Some(entries) = collections.get_mut(&collection) else {
            return Ok(DeleteOutcome::new(0));
        };

        let before = entries.len();
        entries.retain(|(key, _)| *key != id);
        Ok(DeleteOutcome::new((before - entries.len()) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let store = InMemoryDocumentStore::new();
        let outcome = store
            .insert_one(Collection::Parcels, doc! { "senderName": "Bo" })
            .await
            .unwrap();
        assert!(outcome.acknowledged);

        let id = DocumentId::parse(&outcome.inserted_id).unwrap();
        let stored = store
            .find_by_id(Collection::Parcels, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get_object_id(ID_FIELD).unwrap(), id.object_id());
        assert_eq!(stored.get_str("senderName").unwrap(), "Bo");

        assert!(
            store
                .find_by_id(Collection::Books, id)
                .await
                .unwrap()
                .is_none(),
            "Collections must not share documents"
        );
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order_and_filters() {
        let store = InMemoryDocumentStore::new();
        for email in ["a@b.com", "c@d.com", "a@b.com"] {
            store
                .insert_one(Collection::Parcels, doc! { "email": email })
                .await
                .unwrap();
        }

        let all = store.find(Collection::Parcels, Query::All).await.unwrap();
        let emails: Vec<_> = all.iter().map(|d| d.get_str("email").unwrap()).collect();
        assert_eq!(emails, vec!["a@b.com", "c@d.com", "a@b.com"]);

        let filtered = store
            .find(Collection::Parcels, Query::field_equals("email", "a@b.com"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);

        assert!(
            store
                .find(Collection::Coverage, Query::All)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_upsert_creates_missing_document() {
        let store = InMemoryDocumentStore::new();
        let id = DocumentId::generate();

        let outcome = store
            .upsert_by_id(Collection::Parcels, id, doc! { "status": "paid" })
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::upserted(id));

        let stored = store
            .find_by_id(Collection::Parcels, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, doc! { "_id": id.object_id(), "status": "paid" });
    }

    #[tokio::test]
    async fn test_upsert_merges_into_existing_document() {
        let store = InMemoryDocumentStore::new();
        let outcome = store
            .insert_one(Collection::Parcels, doc! { "status": "new", "cost": 10 })
            .await
            .unwrap();
        let id = DocumentId::parse(&outcome.inserted_id).unwrap();

        let update = store
            .upsert_by_id(Collection::Parcels, id, doc! { "status": "paid" })
            .await
            .unwrap();
        assert_eq!(update, UpdateOutcome::matched(true));

        let stored = store
            .find_by_id(Collection::Parcels, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get_str("status").unwrap(), "paid");
        assert_eq!(stored.get_i32("cost").unwrap(), 10);

        let unchanged = store
            .upsert_by_id(Collection::Parcels, id, doc! { "status": "paid" })
            .await
            .unwrap();
        assert_eq!(unchanged.modified_count, 0);
        assert_eq!(unchanged.matched_count, 1);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = InMemoryDocumentStore::new();
        let outcome = store
            .insert_one(Collection::Parcels, doc! { "status": "new" })
            .await
            .unwrap();
        let id = DocumentId::parse(&outcome.inserted_id).unwrap();

        let deleted = store.delete_by_id(Collection::Parcels, id).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);

        let again = store.delete_by_id(Collection::Parcels, id).await.unwrap();
        assert_eq!(again.deleted_count, 0);

        let untouched = store
            .delete_by_id(Collection::Books, DocumentId::generate())
            .await
            .unwrap();
        assert_eq!(untouched.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_seed_keeps_object_ids() {
        let store = InMemoryDocumentStore::new();
        let id = DocumentId::generate();
        store
            .seed(
                Collection::Books,
                vec![doc! { "_id": id.object_id(), "title": "Dune" }, doc! { "title": "Emma" }],
            )
            .await;

        let books = store.find(Collection::Books, Query::All).await.unwrap();
        assert_eq!(books.len(), 2);
        assert!(books.iter().all(|b| b.get_object_id(ID_FIELD).is_ok()));
        assert!(
            store
                .find_by_id(Collection::Books, id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
