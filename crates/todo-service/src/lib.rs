//! Record lifecycle for the todo ledger.
//!
//! This crate is the heart of the service. It provides:
//! - [`IdAllocator`] with a store-backed [`StoreCounter`] and an in-memory
//!   [`AtomicCounter`]
//! - [`TodoService`]: create, read, update, and delete over any
//!   [`todo_store::DocumentStore`]
//! - [`ServiceError`], whose display text is the client-facing message

pub mod allocator;
pub mod error;
pub mod service;
pub mod traits;

pub use allocator::{AtomicCounter, StoreCounter, COUNTER_NAME};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use service::{Deletion, TodoService, ID_FIELD};
pub use traits::IdAllocator;
