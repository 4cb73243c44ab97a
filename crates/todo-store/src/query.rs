//! Field predicates for searching, updating, and removing documents.

use std::cmp::Ordering;

use serde_json::Value;

use crate::Document;

/// A predicate over a single document.
///
/// Build predicates with [`Query::field`]:
///
/// ```
/// use todo_store::Query;
/// let q = Query::field("t_id").eq(3).and(Query::field("completed").eq(false));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    /// Matches every document.
    Any,
    /// The field exists and equals the value.
    Eq(String, Value),
    /// The field is a number greater than or equal to the bound.
    Ge(String, f64),
    /// The field is present, whatever its value.
    Exists(String),
    /// Both predicates match.
    And(Box<Query>, Box<Query>),
}

impl Query {
    pub fn field(name: impl Into<String>) -> Field {
        Field(name.into())
    }

    pub fn and(self, other: Query) -> Query {
        Query::And(Box::new(self), Box::new(other))
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::Any => true,
            Self::Eq(field, value) => document.get(field).is_some_and(|v| values_equal(v, value)),
            Self::Ge(field, bound) => document
                .get(field)
                .and_then(Value::as_f64)
                .and_then(|v| v.partial_cmp(bound))
                .is_some_and(|ord| ord != Ordering::Less),
            Self::Exists(field) => document.contains_key(field),
            Self::And(a, b) => a.matches(document) && b.matches(document),
        }
    }
}

/// Numbers compare by value so `1` matches `1.0`; everything else is
/// structural equality.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

/// Builder returned by [`Query::field`].
#[derive(Clone, Debug)]
pub struct Field(String);

impl Field {
    pub fn eq(self, value: impl Into<Value>) -> Query {
        Query::Eq(self.0, value.into())
    }

    pub fn ge(self, bound: impl Into<f64>) -> Query {
        Query::Ge(self.0, bound.into())
    }

    pub fn exists(self) -> Query {
        Query::Exists(self.0)
    }
}
