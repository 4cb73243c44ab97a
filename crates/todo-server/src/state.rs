use std::sync::Arc;

use todo_service::TodoService;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: TodoService,
    /// Redirect target for unknown routes; `None` answers them with 404.
    pub fallback_redirect: Option<Arc<str>>,
}

impl AppState {
    pub fn new(service: TodoService, fallback_redirect: Option<&str>) -> Self {
        Self {
            service,
            fallback_redirect: fallback_redirect.map(Arc::from),
        }
    }
}
