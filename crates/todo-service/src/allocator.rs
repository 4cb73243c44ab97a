//! Sequential id allocation.
//!
//! [`StoreCounter`] keeps the counter as a singleton document in the same
//! store as the todos, so ids survive restarts. [`AtomicCounter`] keeps it
//! in memory.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use todo_store::{from_document, to_document, DocumentStore, Query, StoreError};
use todo_types::TodoId;

use crate::error::{ServiceError, ServiceResult};
use crate::traits::IdAllocator;

/// `name` of the counter document.
pub const COUNTER_NAME: &str = "super special counting key";

#[derive(Debug, Serialize, Deserialize)]
struct CounterRecord {
    name: String,
    count: i64,
}

fn counter_query() -> Query {
    Query::field("name").eq(COUNTER_NAME)
}

/// Counter stored as `{"name": COUNTER_NAME, "count": n}` in a document store.
///
/// The record is created with count 0 on first use. Read-then-write is
/// serialized by a mutex, which covers every caller sharing this instance
/// but not other processes writing the same store.
pub struct StoreCounter {
    store: Arc<dyn DocumentStore>,
    lock: Mutex<()>,
}

impl StoreCounter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    fn current(&self) -> ServiceResult<Option<i64>> {
        let found = self.store.search(&counter_query())?;
        match found.into_iter().next() {
            Some(doc) => {
                let record: CounterRecord =
                    from_document(doc).map_err(|e| ServiceError::Corrupt(e.to_string()))?;
                Ok(Some(record.count))
            }
            None => Ok(None),
        }
    }

    fn current_or_create(&self) -> ServiceResult<i64> {
        if let Some(count) = self.current()? {
            return Ok(count);
        }
        debug!("counter record not found, creating");
        let record = CounterRecord {
            name: COUNTER_NAME.to_string(),
            count: 0,
        };
        self.store.insert(to_document(&record)?)?;
        Ok(0)
    }
}

impl IdAllocator for StoreCounter {
    fn allocate_next_id(&self) -> ServiceResult<TodoId> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ServiceError::Store(StoreError::LockPoisoned))?;

        let count = self.current_or_create()?;
        debug!(count, "current count");

        let next = to_document(&json!({ "count": count + 1 }))?;
        self.store.update(&next, &counter_query())?;
        Ok(TodoId(count))
    }

    fn peek(&self) -> ServiceResult<TodoId> {
        Ok(TodoId(self.current()?.unwrap_or(0)))
    }
}

impl std::fmt::Debug for StoreCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCounter").finish_non_exhaustive()
    }
}

/// In-memory counter.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    next: AtomicI64,
}

impl AtomicCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the sequence at `first`.
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl IdAllocator for AtomicCounter {
    fn allocate_next_id(&self) -> ServiceResult<TodoId> {
        Ok(TodoId(self.next.fetch_add(1, Ordering::SeqCst)))
    }

    fn peek(&self) -> ServiceResult<TodoId> {
        Ok(TodoId(self.next.load(Ordering::SeqCst)))
    }
}
