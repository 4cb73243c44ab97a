use todo_store::StoreError;
use todo_types::{TodoId, TypeError};

/// Broad classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input, including bad dates.
    Validation,
    /// No record with the requested id.
    NotFound,
    /// The id was not an integer.
    Type,
    /// The store failed or holds something unreadable.
    Internal,
}

/// Errors produced by record lifecycle operations.
///
/// The display text of every non-internal variant is the message shown to
/// clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Must have a title for your todo!")]
    MissingTitle,

    #[error("Invalid date received - please use ISO8601!")]
    InvalidDate(String),

    #[error("Must have an integer as the todo ID!")]
    InvalidId(String),

    #[error("No records found.")]
    NoRecords,

    /// A read for a single id found nothing.
    #[error("No todo found with that ID.")]
    NoSuchTodo(TodoId),

    /// An update or delete targeted an id that does not exist.
    #[error("No records found with ID {0}")]
    NotFound(TodoId),

    #[error("corrupt document: {0}")]
    Corrupt(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingTitle | Self::InvalidDate(_) => ErrorKind::Validation,
            Self::InvalidId(_) => ErrorKind::Type,
            Self::NoRecords | Self::NoSuchTodo(_) | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Corrupt(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<TypeError> for ServiceError {
    fn from(e: TypeError) -> Self {
        match e {
            TypeError::InvalidDate(input) => Self::InvalidDate(input),
            TypeError::InvalidId(input) => Self::InvalidId(input),
            TypeError::Serialization(reason) => Self::Corrupt(reason),
        }
    }
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
