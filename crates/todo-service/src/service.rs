use std::sync::Arc;

use tracing::info;

use todo_store::{from_document, to_document, DocumentStore, Document, Query};
use todo_types::{utc_now, NewTodo, Selector, TodoId, TodoRecord, TodoUpdate};

use crate::allocator::StoreCounter;
use crate::error::{ServiceError, ServiceResult};
use crate::traits::IdAllocator;

/// Key todo documents are indexed by.
pub const ID_FIELD: &str = "t_id";

fn by_id(id: TodoId) -> Query {
    Query::field(ID_FIELD).eq(id.get())
}

/// Outcome of a delete request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deletion {
    /// The record was removed.
    Removed(TodoId),
    /// The record exists and would have been removed.
    DryRun(TodoId),
}

impl Deletion {
    pub fn id(&self) -> TodoId {
        match self {
            Self::Removed(id) | Self::DryRun(id) => *id,
        }
    }
}

/// Creates, reads, updates, and deletes todo records.
///
/// The store and allocator are injected, so the same service runs against
/// a JSON file in production and an in-memory table in tests.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn DocumentStore>,
    ids: Arc<dyn IdAllocator>,
}

impl TodoService {
    pub fn new(store: Arc<dyn DocumentStore>, ids: Arc<dyn IdAllocator>) -> Self {
        Self { store, ids }
    }

    /// Service whose ids come from a counter document in `store`.
    pub fn with_store_counter(store: Arc<dyn DocumentStore>) -> Self {
        let ids = Arc::new(StoreCounter::new(store.clone()));
        Self::new(store, ids)
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Create a record from `new` and persist it.
    pub fn create(&self, new: NewTodo) -> ServiceResult<TodoRecord> {
        if new.title.is_empty() {
            return Err(ServiceError::MissingTitle);
        }
        let due_date = match new.due_date.as_deref().filter(|d| !d.is_empty()) {
            Some(raw) => Some(todo_types::parse_iso8601(raw)?),
            None => None,
        };

        let id = self.ids.allocate_next_id()?;
        let now = utc_now();
        let mut record = TodoRecord::new(id, new.title, now);
        record.due_date = due_date;
        record.completed = new.completed;
        if record.completed {
            record.completed_date = Some(now);
        }

        self.store.insert(to_document(&record)?)?;
        info!(id = %record.id, "created todo");
        Ok(record)
    }

    /// Records selected by `selector`.
    ///
    /// `All` fails with [`ServiceError::NoRecords`] when the store holds no
    /// todos; a single id fails with [`ServiceError::NoSuchTodo`].
    pub fn read(&self, selector: Selector) -> ServiceResult<Vec<TodoRecord>> {
        match selector {
            Selector::All => {
                let records = self.list()?;
                if records.is_empty() {
                    return Err(ServiceError::NoRecords);
                }
                Ok(records)
            }
            Selector::One(id) => self
                .find(id)?
                .map(|record| vec![record])
                .ok_or(ServiceError::NoSuchTodo(id)),
        }
    }

    /// Parse a path token (`"all"` or an integer) and read.
    pub fn read_token(&self, token: &str) -> ServiceResult<Vec<TodoRecord>> {
        self.read(token.parse()?)
    }

    /// Every todo, ordered by id. Empty when there are none.
    pub fn list(&self) -> ServiceResult<Vec<TodoRecord>> {
        let docs = self.store.search(&Query::field(ID_FIELD).ge(0))?;
        let mut records = docs
            .into_iter()
            .map(decode)
            .collect::<ServiceResult<Vec<_>>>()?;
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    /// The record with `id`, if any.
    pub fn find(&self, id: TodoId) -> ServiceResult<Option<TodoRecord>> {
        match self.store.search(&by_id(id))?.into_iter().next() {
            Some(doc) => decode(doc).map(Some),
            None => Ok(None),
        }
    }

    /// Apply `update` to the record with `id`.
    ///
    /// The due date is validated before anything is written; a bad date
    /// fails the whole update.
    pub fn update(&self, id: TodoId, update: TodoUpdate) -> ServiceResult<TodoRecord> {
        let mut record = self.find(id)?.ok_or(ServiceError::NotFound(id))?;
        let changes = update.validate()?;

        record.apply(changes, utc_now());
        self.store.update(&to_document(&record)?, &by_id(id))?;
        info!(id = %id, completed = record.completed, "updated todo");
        Ok(record)
    }

    /// Delete the record with `id`, or only check that it exists when
    /// `dry_run` is set.
    pub fn delete(&self, id: TodoId, dry_run: bool) -> ServiceResult<Deletion> {
        let query = by_id(id);
        if !self.store.contains(&query)? {
            return Err(ServiceError::NotFound(id));
        }
        if dry_run {
            info!(id = %id, "dry-run delete");
            return Ok(Deletion::DryRun(id));
        }
        self.store.remove(&query)?;
        info!(id = %id, "deleted todo");
        Ok(Deletion::Removed(id))
    }
}

fn decode(doc: Document) -> ServiceResult<TodoRecord> {
    from_document(doc).map_err(|e| ServiceError::Corrupt(e.to_string()))
}

impl std::fmt::Debug for TodoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoService").finish_non_exhaustive()
    }
}
