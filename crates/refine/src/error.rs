//! Error types for the refine crate.

use std::fmt::Display;

use thiserror::Error;

/// Errors raised while building predicates, resolving sort keys or
/// configuring a collection.
#[derive(Debug, Error)]
pub enum RefineError {
    /// A raw parameter value could not be converted to the type a filter,
    /// field or paging parameter accepts.
    #[error("cannot convert '{raw}' to {target}: {reason}")]
    Conversion {
        raw: String,
        target: &'static str,
        reason: String,
    },

    /// The requested (or defaulted) sort key matches neither a registered
    /// sort definition nor, with dynamic paging, a discoverable field.
    #[error("no sort definition found for key '{key}'")]
    SortKeyNotFound { key: String },

    /// Programmer misuse of the collection facade.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RefineError {
    pub(crate) fn conversion(raw: &str, target: &'static str, reason: impl Display) -> Self {
        RefineError::Conversion {
            raw: raw.to_string(),
            target,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        RefineError::Configuration(message.into())
    }
}

/// Result type for refine operations.
pub type Result<T> = std::result::Result<T, RefineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_message_names_raw_and_target() {
        let err = RefineError::conversion("abc", "i32", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "cannot convert 'abc' to i32: invalid digit found in string"
        );
    }

    #[test]
    fn sort_key_message() {
        let err = RefineError::SortKeyNotFound {
            key: "missing".into(),
        };
        assert_eq!(err.to_string(), "no sort definition found for key 'missing'");
    }
}
