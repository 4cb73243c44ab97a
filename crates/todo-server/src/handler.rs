use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde_json::{json, Value};

use todo_service::{Deletion, ServiceError, ServiceResult, TodoService};
use todo_types::{Envelope, Selector, TodoId};

use crate::form::{read_form, CreateTodoForm, DeleteTodoForm, UpdateTodoForm};
use crate::response::ApiResponse;
use crate::state::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Resource not found.";

type ApiResult = Result<ApiResponse, ApiResponse>;

fn parse_id(raw: &str) -> Result<TodoId, ServiceError> {
    raw.parse::<TodoId>().map_err(ServiceError::from)
}

/// Run a service call on the blocking pool. Store writes hit the disk while
/// holding the table lock, so they stay off the async workers.
async fn blocking<T, F>(state: &AppState, call: F) -> Result<T, ApiResponse>
where
    F: FnOnce(&TodoService) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || call(&service)).await {
        Ok(result) => result.map_err(ApiResponse::from),
        Err(e) => {
            tracing::warn!(error = %e, "service task failed");
            Err(ApiResponse::internal())
        }
    }
}

/// `POST /todos`
pub async fn create_todo(
    State(state): State<AppState>,
    form: Result<Form<CreateTodoForm>, FormRejection>,
) -> ApiResult {
    let new = read_form(form)
        .and_then(CreateTodoForm::into_new_todo)
        .map_err(ApiResponse::validation)?;
    let record = blocking(&state, move |service| service.create(new)).await?;
    Ok(ApiResponse::success(
        format!("Created new todo entry! Record ID: {}", record.id),
        json!({ "t_id": record.id }),
    ))
}

/// `GET /todo/{id|all}`
pub async fn get_todo(State(state): State<AppState>, Path(todo_id): Path<String>) -> ApiResult {
    let selector: Selector = todo_id.parse().map_err(ServiceError::from)?;
    let records = blocking(&state, move |service| service.read(selector)).await?;
    let message = match selector {
        Selector::All => "Retrieved all records available.",
        Selector::One(_) => "Requested record(s) found.",
    };
    Ok(ApiResponse::success(message, serde_json::to_value(records)?))
}

/// `PUT /todo/{id}`
pub async fn update_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    form: Result<Form<UpdateTodoForm>, FormRejection>,
) -> ApiResult {
    let id = parse_id(&todo_id)?;
    let update = read_form(form)
        .and_then(UpdateTodoForm::into_update)
        .map_err(ApiResponse::validation)?;
    let record = blocking(&state, move |service| service.update(id, update)).await?;
    Ok(ApiResponse::success(
        format!("Updated information for record ID {id}"),
        serde_json::to_value(record)?,
    ))
}

/// `DELETE /todo/{id}`
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    form: Result<Form<DeleteTodoForm>, FormRejection>,
) -> ApiResult {
    let id = parse_id(&todo_id)?;
    let dry_run = read_form(form)
        .and_then(DeleteTodoForm::dry_run)
        .map_err(ApiResponse::validation)?;
    let message = match blocking(&state, move |service| service.delete(id, dry_run)).await? {
        Deletion::Removed(id) => format!("Record ID {id} deleted."),
        Deletion::DryRun(id) => format!("Record ID {id} would be deleted (dry run)."),
    };
    Ok(ApiResponse::success(message, Value::Null))
}

/// Everything the router does not recognize.
pub async fn fallback(State(state): State<AppState>) -> Response {
    match state.fallback_redirect.as_deref() {
        Some(url) => (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response(),
        None => ApiResponse::new(
            StatusCode::NOT_FOUND,
            Envelope::error(NOT_FOUND_MESSAGE, Value::Null),
        )
        .into_response(),
    }
}
