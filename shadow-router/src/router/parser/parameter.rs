//! Bound statement parameter.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Parameter bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Parameter {
    /// Postgres would read this parameter as boolean true.
    pub fn is_true(&self) -> bool {
        match self {
            Self::Null | Self::Float(_) => false,
            Self::Boolean(value) => *value,
            Self::Integer(value) => *value != 0,
            Self::Text(value) => text_is_true(value),
        }
    }
}

/// Accepts the spellings Postgres uses for boolean input.
pub(crate) fn text_is_true(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "t" | "true" | "y" | "yes" | "on" | "1"
    )
}

impl Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
