//! In-memory storage implementation for document stores.
//!
//! Collections keep their documents in insertion order behind a single async-aware
//! read-write lock. Every mutation goes through the write guard, so concurrent writers
//! are serialized and never lose updates; readers share the read guard.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document};

use gamelayer_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{DocumentId, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Query,
};

use crate::evaluator::{DocumentEvaluator, values_equal};

type StoreMap = HashMap<String, MemoryCollection>;


/// One collection: documents in insertion order plus the fields that must stay unique.
#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<(DocumentId, Bson)>,
    unique_fields: Vec<String>,
}

impl MemoryCollection {
    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents
            .iter()
            .position(|(stored_id, _)| stored_id == id)
    }

    /// Checks `candidate` against every stored document except `except`, plus `pending`
    /// documents that are about to be written in the same batch.
    fn check_unique(
        &self,
        candidate: &Document,
        except: Option<&DocumentId>,
        pending: &[Bson],
        collection: &str,
    ) -> DocumentStoreResult<()> {
        let stored = self.documents
            .iter()
            .filter(|(id, _)| Some(id) != except)
            .map(|(_, doc)| doc);

        for other in stored.chain(pending.iter()) {
            let Some(other) = other.as_document() else {
                continue;
            };

            for field in &self.unique_fields {
                if let (Some(left), Some(right)) = (candidate.get(field), other.get(field)) {
                    if values_equal(left, right) {
                        return Err(DocumentStoreError::DuplicateKey(
                            format!("{field}: {right}"),
                            collection.to_string(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

fn expect_document(bson: Bson) -> DocumentStoreResult<Document> {
    match bson {
        Bson::Document(doc) => Ok(doc),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
    }
}

fn not_found(id: &DocumentId, collection: &str) -> DocumentStoreError {
    DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string())
}


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones
/// share the same underlying data. Nothing is persisted.
///
/// # Performance
///
/// Queries and unique checks scan the whole collection. That is fine for catalogs of
/// a few thousand records; use a persistent backend for anything larger.
///
/// # Example
///
/// ```ignore
/// use gamelayer_memory::InMemoryStore;
/// use gamelayer::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let stored = store
///         .insert_documents(vec![Bson::Document(doc! { "title": "Discworld" })], "games")
///         .await?;
///     assert_eq!(stored.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> collection
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_default();

        Ok(())
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        // Non-unique indexes would only speed up scans, which this store never does.
        if !unique {
            return Ok(());
        }

        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.unique_fields.iter().any(|existing| existing == field) {
            return Ok(());
        }

        // Existing documents must already satisfy the new constraint.
        let mut seen: Vec<&Bson> = Vec::new();
        for (_, doc) in &collection_map.documents {
            if let Some(value) = doc.as_document().and_then(|d| d.get(field)) {
                if seen.iter().any(|other| values_equal(other, value)) {
                    return Err(DocumentStoreError::DuplicateKey(
                        format!("{field}: {value}"),
                        collection.to_string(),
                    ));
                }
                seen.push(value);
            }
        }

        collection_map.unique_fields.push(field.to_string());
        log::debug!("unique index on {collection}.{field} created");

        Ok(())
    }

    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        // Validate the whole batch before writing any of it.
        let mut prepared: Vec<(DocumentId, Bson)> = Vec::with_capacity(documents.len());
        let mut pending: Vec<Bson> = Vec::with_capacity(documents.len());

        for document in documents {
            let mut doc = expect_document(document)?;
            let id = DocumentId::generate();
            doc.insert(ID_FIELD, id);

            collection_map.check_unique(&doc, None, &pending, collection)?;

            pending.push(Bson::Document(doc));
            prepared.push((id, pending[pending.len() - 1].clone()));
        }

        log::debug!("inserted {} document(s) into {collection}", prepared.len());
        collection_map.documents.extend(prepared);

        Ok(pending)
    }

    async fn get_documents(&self, ids: Vec<DocumentId>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        Ok(
            ids.iter()
                .filter_map(|id| collection_map.position(id))
                .map(|index| collection_map.documents[index].1.clone())
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let documents = collection_map
            .documents
            .iter()
            .map(|(_, doc)| doc);

        let filtered_docs = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(documents, filter)?,
            None => documents.collect::<Vec<_>>(),
        };

        Ok(
            filtered_docs
                .into_iter()
                .take(query.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        )
    }

    async fn replace_document(&self, id: DocumentId, document: Bson, collection: &str) -> DocumentStoreResult<Bson> {
        let mut store = self.store.write().await;
        let collection_map = store
            .get_mut(collection)
            .ok_or_else(|| not_found(&id, collection))?;
        let index = collection_map
            .position(&id)
            .ok_or_else(|| not_found(&id, collection))?;

        let mut doc = expect_document(document)?;
        doc.insert(ID_FIELD, id);

        collection_map.check_unique(&doc, Some(&id), &[], collection)?;

        let replaced = Bson::Document(doc);
        collection_map.documents[index].1 = replaced.clone();
        log::debug!("replaced {id} in {collection}");

        Ok(replaced)
    }

    async fn merge_document(&self, id: DocumentId, fields: Bson, collection: &str) -> DocumentStoreResult<Bson> {
        let mut store = self.store.write().await;
        let collection_map = store
            .get_mut(collection)
            .ok_or_else(|| not_found(&id, collection))?;
        let index = collection_map
            .position(&id)
            .ok_or_else(|| not_found(&id, collection))?;

        let mut doc = expect_document(collection_map.documents[index].1.clone())?;

        for (key, value) in expect_document(fields)? {
            if key == ID_FIELD || value == Bson::Null {
                continue;
            }

            doc.insert(key, value);
        }

        collection_map.check_unique(&doc, Some(&id), &[], collection)?;

        let merged = Bson::Document(doc);
        collection_map.documents[index].1 = merged.clone();
        log::debug!("merged fields into {id} in {collection}");

        Ok(merged)
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Bson> {
        let mut store = self.store.write().await;
        let collection_map = store
            .get_mut(collection)
            .ok_or_else(|| not_found(&id, collection))?;
        let index = collection_map
            .position(&id)
            .ok_or_else(|| not_found(&id, collection))?;

        let (_, removed) = collection_map.documents.remove(index);
        log::debug!("deleted {id} from {collection}");

        Ok(removed)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use gamelayer_memory::InMemoryStore;
/// use gamelayer::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder().build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use gamelayer_core::query::Filter;

    const GAMES: &str = "games";

    fn game(slug: &str, series: &str, release: i64, title: &str) -> Bson {
        Bson::Document(doc! {
            "slug": slug,
            "genre": "Adventure",
            "series": series,
            "release": release,
            "title": title,
        })
    }

    async fn store_with_title_index() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.create_collection(GAMES).await.unwrap();
        store.add_index(GAMES, "title", true).await.unwrap();
        store
    }

    fn id_of(document: &Bson) -> DocumentId {
        document
            .as_document()
            .unwrap()
            .get_str(ID_FIELD)
            .unwrap()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = store_with_title_index().await;

        let stored = store
            .insert_documents(
                vec![
                    game("mi1", "Monkey Island", 1, "MI1"),
                    game("mi2", "Monkey Island", 2, "MI2"),
                ],
                GAMES,
            )
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_ne!(id_of(&stored[0]), id_of(&stored[1]));
    }

    #[tokio::test]
    async fn insert_overwrites_caller_supplied_id() {
        let store = store_with_title_index().await;
        let mut candidate = game("mi1", "Monkey Island", 1, "MI1");
        candidate.as_document_mut().unwrap().insert(ID_FIELD, "not-a-uuid");

        let stored = store.insert_documents(vec![candidate], GAMES).await.unwrap();

        assert!(stored[0].as_document().unwrap().get_str(ID_FIELD).unwrap().parse::<DocumentId>().is_ok());
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected_and_nothing_is_written() {
        let store = store_with_title_index().await;
        store
            .insert_documents(vec![game("mi1", "Monkey Island", 1, "MI1")], GAMES)
            .await
            .unwrap();

        let result = store
            .insert_documents(
                vec![
                    game("dw1", "Discworld", 1, "Discworld"),
                    game("mi1-copy", "Monkey Island", 1, "MI1"),
                ],
                GAMES,
            )
            .await;

        assert!(matches!(result, Err(DocumentStoreError::DuplicateKey(_, _))));
        let all = store.query_documents(Query::new(), GAMES).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_within_one_batch_is_rejected() {
        let store = store_with_title_index().await;

        let result = store
            .insert_documents(
                vec![
                    game("a", "S", 1, "Same"),
                    game("b", "S", 2, "Same"),
                ],
                GAMES,
            )
            .await;

        assert!(matches!(result, Err(DocumentStoreError::DuplicateKey(_, _))));
    }

    #[tokio::test]
    async fn unique_index_rejects_existing_duplicates() {
        let store = InMemoryStore::new();
        store
            .insert_documents(vec![game("a", "S", 1, "Same"), game("b", "S", 2, "Same")], GAMES)
            .await
            .unwrap();

        let result = store.add_index(GAMES, "title", true).await;

        assert!(matches!(result, Err(DocumentStoreError::DuplicateKey(_, _))));
    }

    #[tokio::test]
    async fn query_preserves_insertion_order_and_limit() {
        let store = store_with_title_index().await;
        store
            .insert_documents(
                vec![
                    game("mi1", "Monkey Island", 1, "MI1"),
                    game("dw1", "Discworld", 1, "DW1"),
                    game("mi2", "Monkey Island", 2, "MI2"),
                ],
                GAMES,
            )
            .await
            .unwrap();

        let monkey = store
            .query_documents(
                Query::builder().filter(Filter::eq("series", "Monkey Island")).build(),
                GAMES,
            )
            .await
            .unwrap();
        let slugs: Vec<_> = monkey
            .iter()
            .map(|d| d.as_document().unwrap().get_str("slug").unwrap().to_string())
            .collect();
        assert_eq!(slugs, vec!["mi1", "mi2"]);

        let first = store
            .query_documents(Query::builder().limit(1).build(), GAMES)
            .await
            .unwrap();
        assert_eq!(first[0].as_document().unwrap().get_str("slug").unwrap(), "mi1");
    }

    #[tokio::test]
    async fn query_on_unknown_collection_is_empty() {
        let store = InMemoryStore::new();

        assert!(store.query_documents(Query::new(), "nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_keeps_id_and_overwrites_fields() {
        let store = store_with_title_index().await;
        let stored = store
            .insert_documents(vec![game("mi1", "Monkey Island", 1, "MI1")], GAMES)
            .await
            .unwrap();
        let id = id_of(&stored[0]);

        let replaced = store
            .replace_document(id, game("gk1", "Gabriel Knight", 1, "GK1"), GAMES)
            .await
            .unwrap();

        assert_eq!(id_of(&replaced), id);
        let fetched = store.get_documents(vec![id], GAMES).await.unwrap();
        assert_eq!(fetched, vec![replaced]);
        assert_eq!(fetched[0].as_document().unwrap().get_str("slug").unwrap(), "gk1");
    }

    #[tokio::test]
    async fn replace_missing_id_is_not_found() {
        let store = store_with_title_index().await;

        let result = store
            .replace_document(DocumentId::generate(), game("x", "X", 1, "X"), GAMES)
            .await;

        assert!(matches!(result, Err(DocumentStoreError::DocumentNotFound(_, _))));
        assert!(store.query_documents(Query::new(), GAMES).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_may_keep_its_own_title() {
        let store = store_with_title_index().await;
        let stored = store
            .insert_documents(vec![game("mi1", "Monkey Island", 1, "MI1")], GAMES)
            .await
            .unwrap();

        let result = store
            .replace_document(id_of(&stored[0]), game("mi1b", "Monkey Island", 1, "MI1"), GAMES)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn merge_skips_nulls_and_id() {
        let store = store_with_title_index().await;
        let stored = store
            .insert_documents(vec![game("mi1", "Monkey Island", 1, "MI1")], GAMES)
            .await
            .unwrap();
        let id = id_of(&stored[0]);

        let merged = store
            .merge_document(
                id,
                Bson::Document(doc! { "title": "X", "slug": Bson::Null, "id": "other" }),
                GAMES,
            )
            .await
            .unwrap();

        let merged = merged.as_document().unwrap();
        assert_eq!(merged.get_str("title").unwrap(), "X");
        assert_eq!(merged.get_str("slug").unwrap(), "mi1");
        assert_eq!(merged.get_i64("release").unwrap(), 1);
        assert_eq!(merged.get_str(ID_FIELD).unwrap(), id.to_string());
    }

    #[tokio::test]
    async fn merge_into_taken_title_is_rejected() {
        let store = store_with_title_index().await;
        let stored = store
            .insert_documents(
                vec![game("mi1", "Monkey Island", 1, "MI1"), game("mi2", "Monkey Island", 2, "MI2")],
                GAMES,
            )
            .await
            .unwrap();

        let result = store
            .merge_document(id_of(&stored[1]), Bson::Document(doc! { "title": "MI1" }), GAMES)
            .await;

        assert!(matches!(result, Err(DocumentStoreError::DuplicateKey(_, _))));
    }

    #[tokio::test]
    async fn delete_returns_prior_value_once() {
        let store = store_with_title_index().await;
        let stored = store
            .insert_documents(vec![game("mi1", "Monkey Island", 1, "MI1")], GAMES)
            .await
            .unwrap();
        let id = id_of(&stored[0]);

        let removed = store.delete_document(id, GAMES).await.unwrap();
        assert_eq!(removed, stored[0]);

        let again = store.delete_document(id, GAMES).await;
        assert!(matches!(again, Err(DocumentStoreError::DocumentNotFound(_, _))));
        assert!(store.get_documents(vec![id], GAMES).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = store_with_title_index().await;
        let clone = store.clone();

        clone
            .insert_documents(vec![game("mi1", "Monkey Island", 1, "MI1")], GAMES)
            .await
            .unwrap();

        assert_eq!(store.query_documents(Query::new(), GAMES).await.unwrap().len(), 1);
    }
}
