//! Request argument parsing.
//!
//! Each endpoint reads an urlencoded form. Parsing failures are collected
//! per field, keyed by field name and carrying that field's help text, and
//! end up as the data of a "Validation failure!" envelope.

use std::collections::BTreeMap;

use axum::extract::rejection::FormRejection;
use axum::Form;
use serde::Deserialize;

use todo_types::{NewTodo, TodoUpdate};

pub const TITLE_HELP: &str = "Must have a title for your todo!";
pub const COMPLETED_HELP: &str = "True or false; is your todo done?";
pub const DRY_RUN_HELP: &str = "A boolean that simulates the delete process without data loss.";

/// Field name to help text for every argument that failed to parse.
pub type FieldErrors = BTreeMap<String, String>;

fn field_error(field: &str, help: &str) -> FieldErrors {
    FieldErrors::from([(field.to_string(), help.to_string())])
}

/// Unwrap an extracted form.
///
/// A request without an urlencoded content type reads as an empty form;
/// a body that cannot be decoded is reported under `body`.
pub fn read_form<T: Default>(extracted: Result<Form<T>, FormRejection>) -> Result<T, FieldErrors> {
    match extracted {
        Ok(Form(form)) => Ok(form),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(T::default()),
        Err(other) => Err(field_error("body", &other.body_text())),
    }
}

/// Lenient boolean: `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an optional flag field. Empty values count as absent.
fn flag_field(
    raw: Option<String>,
    field: &str,
    help: &str,
    errors: &mut FieldErrors,
) -> Option<bool> {
    let raw = raw.filter(|v| !v.trim().is_empty())?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        errors.insert(field.to_string(), help.to_string());
    }
    parsed
}

/// `POST /todos`
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoForm {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<String>,
}

impl CreateTodoForm {
    pub fn into_new_todo(self) -> Result<NewTodo, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = self.title.filter(|t| !t.is_empty());
        if title.is_none() {
            errors.insert("title".to_string(), TITLE_HELP.to_string());
        }
        let completed = flag_field(self.completed, "completed", COMPLETED_HELP, &mut errors);

        match title {
            Some(title) if errors.is_empty() => Ok(NewTodo {
                title,
                due_date: self.due_date.filter(|d| !d.is_empty()),
                completed: completed.unwrap_or(false),
            }),
            _ => Err(errors),
        }
    }
}

/// `PUT /todo/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoForm {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<String>,
}

impl UpdateTodoForm {
    pub fn into_update(self) -> Result<TodoUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let completed = flag_field(self.completed, "completed", COMPLETED_HELP, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TodoUpdate {
            title: self.title,
            due_date: self.due_date,
            completed,
        })
    }
}

/// `DELETE /todo/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTodoForm {
    pub dry_run: Option<String>,
}

impl DeleteTodoForm {
    pub fn dry_run(self) -> Result<bool, FieldErrors> {
        let mut errors = FieldErrors::new();
        let dry_run = flag_field(self.dry_run, "dry_run", DRY_RUN_HELP, &mut errors);
        if errors.is_empty() {
            Ok(dry_run.unwrap_or(false))
        } else {
            Err(errors)
        }
    }
}
