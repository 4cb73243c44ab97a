//! Foundation types for the todo ledger.
//!
//! Every other crate in the workspace depends on `todo-types`.
//!
//! # Key Types
//!
//! - [`TodoRecord`]: A stored todo item, persisted with its id as `t_id`
//! - [`TodoId`] / [`Selector`]: Integer ids and the `all` path token
//! - [`NewTodo`] / [`TodoUpdate`]: Creation and change requests
//! - [`Envelope`]: The `{status, message, server_time, data}` response wrapper
//! - [`parse_iso8601`]: Due-date validation

pub mod envelope;
pub mod error;
pub mod record;
pub mod temporal;

pub use envelope::{Envelope, Status, VALIDATION_FAILURE};
pub use error::{TypeError, INVALID_DATE_MESSAGE};
pub use record::{NewTodo, Selector, TodoChanges, TodoId, TodoRecord, TodoUpdate, ALL_TOKEN};
pub use temporal::{parse_iso8601, utc_now};
