use todo_types::TodoId;

use crate::error::ServiceResult;

/// Source of sequential todo ids.
///
/// Implementations hand out `0, 1, 2, ...` in call order. Allocation and
/// increment happen as one step from the caller's point of view: two
/// callers in the same process never receive the same id.
pub trait IdAllocator: Send + Sync {
    /// Return the next id and advance the sequence by one.
    fn allocate_next_id(&self) -> ServiceResult<TodoId>;

    /// The id the next call would return, without consuming it.
    fn peek(&self) -> ServiceResult<TodoId>;
}
