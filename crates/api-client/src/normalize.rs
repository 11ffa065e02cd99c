//! Response envelope normalization
//!
//! Backends answer in several shapes: a `{success, data, message}`
//! envelope, a bare object, or a bare array. [`normalize`] turns any of
//! them into a [`NormalizedResult`] so callers only handle one shape.

use crate::error::ApiResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Message used when there is no response to normalize
pub const EMPTY_RESPONSE_MESSAGE: &str = "Invalid or empty response from server";

/// Uniform `{success, data, message}` result
///
/// When `success` is false, `data` holds the caller's neutral default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult<T = Value> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> NormalizedResult<T> {
    /// Successful result without a message
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Failed result carrying the neutral default
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: Some(message.into()),
        }
    }

    /// Builder-style method to set the message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Transform the payload
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NormalizedResult<U> {
        NormalizedResult {
            success: self.success,
            data: f(self.data),
            message: self.message,
        }
    }
}

impl NormalizedResult<Value> {
    /// Deserialize `data` into a typed payload
    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<NormalizedResult<T>> {
        Ok(NormalizedResult {
            success: self.success,
            data: T::deserialize(&self.data)?,
            message: self.message.clone(),
        })
    }
}

/// Default `data` value for the shape a caller expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// List endpoints; empty default is `[]`
    Collection,
    /// Single-entity endpoints; empty default is `null`
    Entity,
}

impl Expected {
    /// The neutral `data` value for this shape
    #[must_use]
    pub fn empty(self) -> Value {
        match self {
            Self::Collection => Value::Array(Vec::new()),
            Self::Entity => Value::Null,
        }
    }
}

/// Normalize a response body
///
/// `None` means there was no response payload at all and yields a failure
/// carrying `empty`.
#[must_use]
pub fn normalize(body: Option<&Value>, empty: Value) -> NormalizedResult {
    match body {
        Some(body) => normalize_body(body),
        None => NormalizedResult::failure(empty, EMPTY_RESPONSE_MESSAGE),
    }
}

/// Normalize a present response body; first matching rule wins
///
/// 1. object with a boolean `success` and a `data` key → passed through
/// 2. any other object → wrapped as data
/// 3. array → wrapped as data (elements are never inspected)
/// 4. anything else → wrapped as data, with a warning
#[must_use]
pub fn normalize_body(body: &Value) -> NormalizedResult {
    match body {
        Value::Object(map) => {
            match (map.get("success").and_then(Value::as_bool), map.get("data")) {
                (Some(success), Some(data)) => NormalizedResult {
                    success,
                    data: data.clone(),
                    message: map.get("message").and_then(message_text),
                },
                _ => NormalizedResult::ok(body.clone()),
            }
        }
        Value::Array(_) => NormalizedResult::ok(body.clone()),
        other => {
            warn!(body = %other, "Normalizer received an unexpected response shape");
            NormalizedResult::ok(other.clone())
        }
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Require a result's `data` to be an array
///
/// Substitutes `[]` when it is not. Successful results also log the
/// mismatch; failures keep their message and `success: false`.
#[must_use]
pub fn ensure_collection(mut result: NormalizedResult, operation: &str) -> NormalizedResult {
    if result.data.is_array() {
        return result;
    }
    if result.success {
        warn!(
            operation,
            data_type = json_type(&result.data),
            "Expected an array; substituting an empty list"
        );
    }
    result.data = Expected::Collection.empty();
    result
}

/// JSON type name, for diagnostics
#[must_use]
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_envelope_passes_through() {
        let body = json!({"success": true, "data": [{"_id": "a"}], "message": "ok"});
        let result = normalize_body(&body);
        assert!(result.success);
        assert_eq!(result.data, json!([{"_id": "a"}]));
        assert_eq!(result.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_envelope_without_message() {
        let body = json!({"success": true, "data": [1, 2, 3]});
        let result = normalize_body(&body);
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_failed_envelope_with_null_data() {
        let body = json!({"success": false, "data": null, "message": "denied"});
        let result = normalize_body(&body);
        assert!(!result.success);
        assert_eq!(result.data, Value::Null);
        assert_eq!(result.message.as_deref(), Some("denied"));
    }

    #[test]
    fn test_success_without_data_is_wrapped() {
        let body = json!({"success": true, "message": "Ticket deleted successfully"});
        let result = normalize_body(&body);
        assert!(result.success);
        assert_eq!(result.data, body);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_non_boolean_success_is_wrapped() {
        let body = json!({"success": "yes", "data": 1});
        assert_eq!(normalize_body(&body), NormalizedResult::ok(body.clone()));
    }

    #[test]
    fn test_bare_object_is_wrapped() {
        let body = json!({"total": 3, "open": 1});
        assert_eq!(normalize_body(&body), NormalizedResult::ok(body.clone()));
    }

    #[test]
    fn test_array_with_success_elements_is_not_an_envelope() {
        let body = json!([{"success": false, "data": 1}]);
        assert_eq!(normalize_body(&body), NormalizedResult::ok(body.clone()));
    }

    #[test]
    fn test_scalars_are_wrapped() {
        for body in [json!(null), json!("text"), json!(42), json!(true)] {
            assert_eq!(normalize_body(&body), NormalizedResult::ok(body.clone()));
        }
    }

    #[test]
    fn test_absent_response() {
        let result = normalize(None, Expected::Collection.empty());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "data": [], "message": EMPTY_RESPONSE_MESSAGE})
        );

        let result = normalize(None, Expected::Entity.empty());
        assert_eq!(result.data, Value::Null);
    }

    #[test]
    fn test_ensure_collection() {
        let fixed = ensure_collection(NormalizedResult::ok(json!({"_id": "x"})), "user_tickets");
        assert!(fixed.success);
        assert_eq!(fixed.data, json!([]));

        let failed = NormalizedResult::failure(json!(null), "nope");
        assert_eq!(
            ensure_collection(failed, "admins"),
            NormalizedResult::failure(json!([]), "nope")
        );

        let failed_list = NormalizedResult::failure(json!([]), "nope");
        assert_eq!(ensure_collection(failed_list.clone(), "admins"), failed_list);
    }

    #[test]
    fn test_decode_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Item {
            id: u32,
        }

        let result = normalize_body(&json!({"success": true, "data": [{"id": 1}]}));
        let typed = result.decode::<Vec<Item>>().unwrap();
        assert_eq!(typed.data, vec![Item { id: 1 }]);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("(success|data|message|[a-z]{1,4})", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn normalize_is_pure(body in arb_json()) {
            let before = body.clone();
            let first = normalize_body(&body);
            let second = normalize_body(&body);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(body, before);
        }

        #[test]
        fn arrays_are_wrapped_unchanged(items in prop::collection::vec(arb_json(), 0..5)) {
            let body = Value::Array(items);
            let result = normalize_body(&body);
            prop_assert!(result.success);
            prop_assert_eq!(result.data, body);
        }
    }
}
