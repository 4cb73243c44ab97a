use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Path token that selects every record instead of a single id.
pub const ALL_TOKEN: &str = "all";

/// Sequential todo identifier, persisted as `t_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl TodoId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidId(s.to_string()))
    }
}

/// Which records a read targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    All,
    One(TodoId),
}

impl FromStr for Selector {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_TOKEN {
            Ok(Self::All)
        } else {
            s.parse().map(Self::One)
        }
    }
}

/// A stored todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    #[serde(rename = "t_id")]
    pub id: TodoId,
    pub title: String,
    pub creation_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

impl TodoRecord {
    /// Build a fresh record stamped at `now`.
    pub fn new(id: TodoId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            creation_date: now,
            last_updated: now,
            due_date: None,
            completed: false,
            completed_date: None,
        }
    }

    /// Apply validated changes and refresh `last_updated`.
    ///
    /// `completed_date` is stamped the first time the record is completed
    /// and is never cleared afterwards, even if `completed` flips back.
    pub fn apply(&mut self, changes: TodoChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(due) = changes.due_date {
            self.due_date = Some(due);
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.last_updated = now;
        self.stamp_completion(now);
    }

    fn stamp_completion(&mut self, now: DateTime<Utc>) {
        if self.completed && self.completed_date.is_none() {
            self.completed_date = Some(now);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// Fields accepted when creating a todo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Requested changes to an existing todo.
///
/// Absent fields and empty strings both leave the stored value untouched,
/// so an update can never blank a title or due date.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Drop empty strings and parse the due date.
    pub fn validate(self) -> Result<TodoChanges, TypeError> {
        let due_date = match non_empty(self.due_date) {
            Some(raw) => Some(crate::temporal::parse_iso8601(&raw)?),
            None => None,
        };
        Ok(TodoChanges {
            title: non_empty(self.title),
            due_date,
            completed: self.completed,
        })
    }
}

/// A [`TodoUpdate`] whose fields have been checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub completed: Option<bool>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
