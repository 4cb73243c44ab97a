//! Uniform response wrapper.
//!
//! Every outcome, success or failure, is reported as
//! `{status, message, server_time, data}`. Empty payloads always surface as
//! an empty list so clients can rely on `data` being present.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::temporal::utc_now;

/// Message used when request arguments fail to parse.
pub const VALIDATION_FAILURE: &str = "Validation failure!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    pub message: String,
    pub server_time: DateTime<Utc>,
    pub data: Value,
}

impl Envelope {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self::build(Status::Success, message.into(), data)
    }

    pub fn error(message: impl Into<String>, data: Value) -> Self {
        Self::build(Status::Error, message.into(), data)
    }

    /// Error envelope for arguments that failed to parse, keyed by field.
    pub fn validation_failure(details: &BTreeMap<String, String>) -> Self {
        let data = details
            .iter()
            .map(|(field, help)| (field.clone(), Value::String(help.clone())))
            .collect();
        Self::error(VALIDATION_FAILURE, Value::Object(data))
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    fn build(status: Status, message: String, data: Value) -> Self {
        Self {
            status,
            message,
            server_time: utc_now(),
            data: normalize_payload(data),
        }
    }
}

/// Replace falsy payloads with `[]`.
fn normalize_payload(data: Value) -> Value {
    let empty = match &data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    };
    if empty {
        Value::Array(Vec::new())
    } else {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_shape() {
        let e = Envelope::success("test", Value::Null);
        assert!(e.is_success());
        let v = serde_json::to_value(&e).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(v["status"], "success");
        assert_eq!(v["message"], "test");
        assert_eq!(v["data"], json!([]));
        assert!(v["server_time"].is_string());
    }

    #[test]
    fn error_shape() {
        let e = Envelope::error("asdf", Value::Null);
        assert!(!e.is_success());
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v.as_object().unwrap().len(), 4);
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "asdf");
    }

    #[test]
    fn payload_is_kept() {
        let e = Envelope::success("ok", json!(["hello"]));
        assert_eq!(e.data, json!(["hello"]));
        let e = Envelope::success("ok", json!({"t_id": 0}));
        assert_eq!(e.data, json!({"t_id": 0}));
    }

    #[test]
    fn falsy_payloads_become_empty_list() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert_eq!(Envelope::success("x", falsy).data, json!([]));
        }
    }

    #[test]
    fn validation_failure_carries_details() {
        let mut details = BTreeMap::new();
        details.insert("title".to_string(), "Must have a title for your todo!".to_string());
        let e = Envelope::validation_failure(&details);
        assert_eq!(e.status, Status::Error);
        assert_eq!(e.message, VALIDATION_FAILURE);
        assert_eq!(e.data, json!({"title": "Must have a title for your todo!"}));
    }

    #[test]
    fn deserializes_back() {
        let e = Envelope::error("nope", json!([1]));
        let text = serde_json::to_string(&e).unwrap();
        let back: Envelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back, e);
    }
}
