//! Document storage for the todo ledger.
//!
//! A document is any JSON object. The store assigns each one an integer
//! [`DocId`] and answers field predicates ([`Query`]) for search, update,
//! and removal. Todo records and the id counter share one table and are
//! told apart by their fields (`t_id` versus `name`).
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `RwLock`-guarded table for tests and embedding
//! - [`JsonFileStore`] -- the same table persisted to one JSON file
//!
//! # Design Rules
//!
//! 1. Ids are store-assigned, start at 1, and grow with the largest live id.
//! 2. Updates are shallow merges into every matching document.
//! 3. Results come back in id order.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod query;
pub mod table;
pub mod traits;

/// Store-assigned document identifier.
pub type DocId = u64;

/// A schemaless JSON document.
pub type Document = serde_json::Map<String, serde_json::Value>;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::{JsonFileStore, DEFAULT_TABLE};
pub use memory::InMemoryDocumentStore;
pub use query::{Field, Query};
pub use table::Table;
pub use traits::DocumentStore;

/// Convert a serializable value into a document.
///
/// Fails with [`StoreError::NotAnObject`] for anything that does not
/// serialize to a JSON object.
pub fn to_document<T: serde::Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Decode a document into a typed value.
pub fn from_document<T: serde::de::DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(document))?)
}
