//! Loosely-typed list input used by tag resolution and bulk assignment.
//!
//! # Invariants
//! - Parsing never fails: malformed encoded text degrades to a single item.
//! - Blank items are dropped after trimming.

use serde_json::Value;

/// Caller-supplied list: already split, or a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListInput {
    Items(Vec<String>),
    Encoded(String),
}

impl ListInput {
    /// Flattens the input into trimmed, non-blank items (duplicates kept).
    pub fn into_items(self) -> Vec<String> {
        let raw = match self {
            Self::Items(items) => items,
            Self::Encoded(text) => decode_list(&text),
        };
        raw.into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

impl From<Vec<String>> for ListInput {
    fn from(value: Vec<String>) -> Self {
        Self::Items(value)
    }
}

impl From<&[&str]> for ListInput {
    fn from(value: &[&str]) -> Self {
        Self::Items(value.iter().map(|item| (*item).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ListInput {
    fn from(value: [&str; N]) -> Self {
        Self::Items(value.iter().map(|item| (*item).to_string()).collect())
    }
}

impl From<&str> for ListInput {
    fn from(value: &str) -> Self {
        Self::Encoded(value.to_string())
    }
}

impl From<String> for ListInput {
    fn from(value: String) -> Self {
        Self::Encoded(value)
    }
}

fn decode_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(values)) => values.into_iter().filter_map(scalar_text).collect(),
        Ok(Value::String(value)) => vec![value],
        Ok(Value::Null) => Vec::new(),
        Ok(_) | Err(_) => vec![trimmed.to_string()],
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
