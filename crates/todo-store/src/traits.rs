use crate::error::StoreResult;
use crate::query::Query;
use crate::{DocId, Document};

/// A collection of schemaless JSON documents.
///
/// All implementations must satisfy these invariants:
/// - Document ids are assigned by the store, start at 1, and are never
///   reused while a larger id exists.
/// - `search` returns documents in ascending id order.
/// - `update` merges the given fields into each match, leaving other keys
///   alone.
/// - The store never interprets document contents beyond evaluating
///   queries.
/// - All I/O errors are propagated, never silently ignored.
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return the id it was stored under.
    fn insert(&self, document: Document) -> StoreResult<DocId>;

    /// Return every document matching `query`.
    fn search(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Merge `fields` into every document matching `query`.
    ///
    /// Returns the ids of the documents that changed.
    fn update(&self, fields: &Document, query: &Query) -> StoreResult<Vec<DocId>>;

    /// Remove every document matching `query` and return their ids.
    fn remove(&self, query: &Query) -> StoreResult<Vec<DocId>>;

    /// Every document in the store.
    fn all(&self) -> StoreResult<Vec<Document>> {
        self.search(&Query::Any)
    }

    /// Whether any document matches `query`.
    fn contains(&self, query: &Query) -> StoreResult<bool> {
        Ok(!self.search(query)?.is_empty())
    }

    /// Number of stored documents.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.all()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
