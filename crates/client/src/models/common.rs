//! Helpers for loosely shaped responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Return the first candidate that is present and non-empty.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Envelope keys that may carry list items, in lookup order.
const LIST_KEYS: [&str; 3] = ["results", "data", "items"];

/// A list response that may arrive as a bare array or as an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    /// Total item count reported by paginated envelopes.
    pub count: Option<u64>,
    /// URL of the next page, when paginated.
    pub next: Option<String>,
}

impl<T: DeserializeOwned> ListResponse<T> {
    /// Decode a list body, taking items from the first present envelope key.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => Ok(Self {
                items: serde_json::from_value(value)?,
                count: None,
                next: None,
            }),
            Value::Object(mut map) => {
                let items = LIST_KEYS
                    .iter()
                    .find_map(|key| map.remove(*key).filter(Value::is_array))
                    .ok_or_else(|| {
                        ClientError::InvalidResponse(
                            "list response has no results/data/items array".to_string(),
                        )
                    })?;
                Ok(Self {
                    items: serde_json::from_value(items)?,
                    count: map.get("count").and_then(Value::as_u64),
                    next: map
                        .get("next")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            }
            other => Err(ClientError::InvalidResponse(format!(
                "expected a list response, got {}",
                type_name(&other)
            ))),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
