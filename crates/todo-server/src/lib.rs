//! HTTP server for the todo ledger.
//!
//! Exposes form-driven CRUD endpoints over a [`todo_service::TodoService`]
//! and answers every request with a [`todo_types::Envelope`].
//!
//! | method   | path            | form fields                        |
//! |----------|-----------------|------------------------------------|
//! | `POST`   | `/todos`        | `title`, `due_date`, `completed`   |
//! | `GET`    | `/todo/{id}`    | (`all` selects every record)       |
//! | `PUT`    | `/todo/{id}`    | `title`, `due_date`, `completed`   |
//! | `DELETE` | `/todo/{id}`    | `dry_run`                          |

pub mod config;
pub mod error;
pub mod form;
pub mod handler;
pub mod response;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, DEFAULT_FALLBACK_URL};
pub use error::{ServerError, ServerResult};
pub use response::ApiResponse;
pub use router::build_router;
pub use server::TodoServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use todo_service::TodoService;
    use todo_store::{InMemoryDocumentStore, JsonFileStore};

    const FORM: &str = "application/x-www-form-urlencoded";

    fn app_with(fallback: Option<&str>) -> Router {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = TodoService::with_store_counter(store);
        build_router(AppState::new(service, fallback))
    }

    fn app() -> Router {
        app_with(Some(DEFAULT_FALLBACK_URL))
    }

    fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, FORM)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bare_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create(app: &Router, body: &str) -> i64 {
        let (status, v) = send(app, form_request("POST", "/todos", body)).await;
        assert_eq!(status, StatusCode::OK, "{v}");
        v["data"]["t_id"].as_i64().unwrap()
    }

    fn assert_envelope(v: &Value, status: &str, message: &str) {
        assert_eq!(v["status"], status, "{v}");
        assert_eq!(v["message"], message, "{v}");
        assert!(v["server_time"].is_string());
        assert!(v.get("data").is_some());
    }

    // -----------------------------------------------------------------------
    // POST /todos
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_returns_new_id() {
        let app = app();
        let (status, v) = send(&app, form_request("POST", "/todos", "title=snarfleblat")).await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "success", "Created new todo entry! Record ID: 0");
        assert_eq!(v["data"], json!({"t_id": 0}));

        let (_, v) = send(&app, form_request("POST", "/todos", "title=second&ignored=1")).await;
        assert_eq!(v["data"]["t_id"], 1);
    }

    #[tokio::test]
    async fn create_without_title_is_validation_failure() {
        let app = app();
        let (status, v) = send(&app, form_request("POST", "/todos", "due_date=2018")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&v, "error", "Validation failure!");
        assert_eq!(v["data"], json!({"title": "Must have a title for your todo!"}));

        let (status, v) = send(&app, bare_request("POST", "/todos")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["data"]["title"], "Must have a title for your todo!");
    }

    #[tokio::test]
    async fn create_with_bad_due_date() {
        let app = app();
        let (status, v) = send(&app, form_request("POST", "/todos", "title=a&due_date=asdf")).await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "error", "Invalid date received - please use ISO8601!");
        assert_eq!(v["data"], json!([]));
    }

    // -----------------------------------------------------------------------
    // GET /todo/{id|all}
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn read_all_on_empty_store() {
        let (status, v) = send(&app(), bare_request("GET", "/todo/all")).await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "error", "No records found.");
    }

    #[tokio::test]
    async fn read_one_and_all() {
        let app = app();
        let id = create(&app, "title=X").await;
        create(&app, "title=Y").await;

        let (status, v) = send(&app, bare_request("GET", &format!("/todo/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "success", "Requested record(s) found.");
        let record = &v["data"][0];
        assert_eq!(record["t_id"], id);
        assert_eq!(record["title"], "X");
        assert_eq!(record["completed"], false);
        assert!(record["completed_date"].is_null());
        assert!(record["due_date"].is_null());
        assert!(record["creation_date"].is_string());

        let (_, v) = send(&app, bare_request("GET", "/todo/all")).await;
        assert_envelope(&v, "success", "Retrieved all records available.");
        assert_eq!(v["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn read_rejects_non_integer_id() {
        let (status, v) = send(&app(), bare_request("GET", "/todo/abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "error", "Must have an integer as the todo ID!");
    }

    #[tokio::test]
    async fn read_missing_id() {
        let (_, v) = send(&app(), bare_request("GET", "/todo/41")).await;
        assert_envelope(&v, "error", "No todo found with that ID.");
    }

    // -----------------------------------------------------------------------
    // PUT /todo/{id}
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn update_fields_and_completion() {
        let app = app();
        let id = create(&app, "title=old").await;
        let uri = format!("/todo/{id}");

        let (status, v) = send(
            &app,
            form_request("PUT", &uri, "title=new&due_date=2018-10-04&completed=true"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "success", &format!("Updated information for record ID {id}"));
        assert_eq!(v["data"]["title"], "new");
        assert_eq!(v["data"]["due_date"], "2018-10-04T00:00:00+00:00");
        assert_eq!(v["data"]["completed"], true);
        let stamped = v["data"]["completed_date"].clone();
        assert!(stamped.is_string());

        let (_, v) = send(&app, form_request("PUT", &uri, "completed=true&title=")).await;
        assert_eq!(v["data"]["completed_date"], stamped);
        assert_eq!(v["data"]["title"], "new");
    }

    #[tokio::test]
    async fn update_without_body_only_touches_last_updated() {
        let app = app();
        let id = create(&app, "title=same").await;
        let (status, v) = send(&app, bare_request("PUT", &format!("/todo/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["status"], "success");
        assert_eq!(v["data"]["title"], "same");
    }

    #[tokio::test]
    async fn update_with_bad_date_fails_whole_request() {
        let app = app();
        let id = create(&app, "title=keep").await;
        let uri = format!("/todo/{id}");

        let (_, v) = send(&app, form_request("PUT", &uri, "title=lost&due_date=2018-31-10")).await;
        assert_envelope(&v, "error", "Invalid date received - please use ISO8601!");

        let (_, v) = send(&app, bare_request("GET", &uri)).await;
        assert_eq!(v["data"][0]["title"], "keep");
    }

    #[tokio::test]
    async fn update_rejects_bad_flag() {
        let app = app();
        let id = create(&app, "title=t").await;
        let (status, v) = send(
            &app,
            form_request("PUT", &format!("/todo/{id}"), "completed=sometimes"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["data"]["completed"], "True or false; is your todo done?");
    }

    #[tokio::test]
    async fn update_missing_and_malformed_ids() {
        let app = app();
        let (_, v) = send(&app, form_request("PUT", "/todo/7", "title=x")).await;
        assert_envelope(&v, "error", "No records found with ID 7");

        let (_, v) = send(&app, form_request("PUT", "/todo/seven", "title=x")).await;
        assert_envelope(&v, "error", "Must have an integer as the todo ID!");
    }

    // -----------------------------------------------------------------------
    // DELETE /todo/{id}
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_then_read() {
        let app = app();
        let id = create(&app, "title=gone").await;
        let uri = format!("/todo/{id}");

        let (status, v) = send(&app, bare_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_envelope(&v, "success", &format!("Record ID {id} deleted."));
        assert_eq!(v["data"], json!([]));

        let (_, v) = send(&app, bare_request("GET", &uri)).await;
        assert_envelope(&v, "error", "No todo found with that ID.");

        let (_, v) = send(&app, bare_request("DELETE", &uri)).await;
        assert_envelope(&v, "error", &format!("No records found with ID {id}"));
    }

    #[tokio::test]
    async fn delete_dry_run_keeps_record() {
        let app = app();
        let id = create(&app, "title=stays").await;
        let uri = format!("/todo/{id}");

        let (_, v) = send(&app, form_request("DELETE", &uri, "dry_run=true")).await;
        assert_envelope(&v, "success", &format!("Record ID {id} would be deleted (dry run)."));

        let (_, v) = send(&app, bare_request("GET", &uri)).await;
        assert_eq!(v["status"], "success");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_against_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::open(dir.path().join("db.json")).unwrap());
        let app = build_router(AppState::new(TodoService::with_store_counter(store), None));

        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let app = app.clone();
                tokio::spawn(async move { create(&app, &format!("title=task{n}")).await })
            })
            .collect();
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (0..16).collect::<Vec<i64>>());

        let reopened = JsonFileStore::open(dir.path().join("db.json")).unwrap();
        let service = TodoService::with_store_counter(Arc::new(reopened));
        assert_eq!(service.list().unwrap().len(), 16);
    }

    // -----------------------------------------------------------------------
    // Unknown routes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unknown_route_redirects() {
        let response = app()
            .oneshot(bare_request("GET", "/nowhere"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION].to_str().unwrap(),
            DEFAULT_FALLBACK_URL
        );
    }

    #[tokio::test]
    async fn unknown_route_404_when_redirect_disabled() {
        let (status, v) = send(&app_with(None), bare_request("GET", "/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&v, "error", handler::NOT_FOUND_MESSAGE);
    }
}
