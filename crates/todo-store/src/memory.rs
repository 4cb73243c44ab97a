use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::table::Table;
use crate::traits::DocumentStore;
use crate::{DocId, Document};

/// In-memory document store.
///
/// Intended for tests and embedding. The table lives behind a `RwLock` for
/// safe concurrent access; documents are cloned on read and write.
pub struct InMemoryDocumentStore {
    table: RwLock<Table>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }

    /// Remove all documents from the store.
    pub fn clear(&self) -> StoreResult<()> {
        *self.table.write().map_err(|_| StoreError::LockPoisoned)? = Table::new();
        Ok(())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, document: Document) -> StoreResult<DocId> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.insert(document))
    }

    fn search(&self, query: &Query) -> StoreResult<Vec<Document>> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.search(query))
    }

    fn update(&self, fields: &Document, query: &Query) -> StoreResult<Vec<DocId>> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.update(fields, query))
    }

    fn remove(&self, query: &Query) -> StoreResult<Vec<DocId>> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.remove(query))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.table.read().map_err(|_| StoreError::LockPoisoned)?.len())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &count)
            .finish()
    }
}
