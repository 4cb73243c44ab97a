//! Flat-file JSON document store.
//!
//! The whole table lives in one JSON file:
//!
//! ```text
//! {"_default": {"1": {...}, "2": {...}}}
//! ```
//!
//! The file is read once when the store opens. Every mutation is applied to
//! a copy of the table, written to a temporary file beside the target, and
//! renamed into place; only then does the in-memory table change. A failed
//! write therefore leaves both the file and the store untouched.
//!
//! One process should own a store file at a time. Nothing coordinates
//! writers across processes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::table::Table;
use crate::traits::DocumentStore;
use crate::{DocId, Document};

/// Name of the table every document is written to.
pub const DEFAULT_TABLE: &str = "_default";

#[derive(Deserialize)]
struct StoreFile {
    #[serde(rename = "_default", default)]
    default: Table,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    #[serde(rename = "_default")]
    default: &'a Table,
}

/// Document store persisted to a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    table: RwLock<Table>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the file (and its parent
    /// directories) if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let existed = path.exists();
        let table = if existed { load(&path)? } else { Table::new() };
        debug!(path = %path.display(), documents = table.len(), "opened store");

        let store = Self {
            path,
            table: RwLock::new(table),
        };
        if !existed {
            store.persist(&Table::new())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, discarding the cached table.
    pub fn reload(&self) -> StoreResult<()> {
        let fresh = load(&self.path)?;
        *self.table.write().map_err(|_| StoreError::LockPoisoned)? = fresh;
        Ok(())
    }

    fn persist(&self, table: &Table) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&StoreFileRef { default: table })?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        let tmp = self
            .path
            .with_file_name(format!(".{file_name}-{}.tmp", Uuid::new_v4()));

        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), documents = table.len(), "store written");
        Ok(())
    }

    /// Apply `change` to a copy of the table, persist it, then publish it.
    fn mutate<T>(&self, change: impl FnOnce(&mut Table) -> T) -> StoreResult<T> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = table.clone();
        let out = change(&mut next);
        self.persist(&next)?;
        *table = next;
        Ok(out)
    }
}

fn load(path: &Path) -> StoreResult<Table> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Table::new());
    }
    let file: StoreFile = serde_json::from_str(&content).map_err(|e| StoreError::CorruptFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(file.default)
}

impl DocumentStore for JsonFileStore {
    fn insert(&self, document: Document) -> StoreResult<DocId> {
        self.mutate(|table| table.insert(document))
    }

    fn search(&self, query: &Query) -> StoreResult<Vec<Document>> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.search(query))
    }

    fn update(&self, fields: &Document, query: &Query) -> StoreResult<Vec<DocId>> {
        self.mutate(|table| table.update(fields, query))
    }

    fn remove(&self, query: &Query) -> StoreResult<Vec<DocId>> {
        self.mutate(|table| table.remove(query))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.table.read().map_err(|_| StoreError::LockPoisoned)?.len())
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("document_count", &self.len().unwrap_or_default())
            .finish()
    }
}
