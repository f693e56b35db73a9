//! Load failures.
//!
//! All three kinds are fatal to the test run. Each carries enough context to point the user at the problem:
//! a 1-based parse position for malformed text, a field path (e.g. `LabUserDatas[1].ClientId`) otherwise.

use std::fmt;

use thiserror::Error;

/// Why a required field was rejected as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// The key is not in the document, or its value is `null`.
    Absent,
    /// The value is present but empty where a non-empty value is required.
    Empty,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Absence::Absent => write!(f, "missing"),
            Absence::Empty => write!(f, "empty"),
        }
    }
}

/// Category of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    MissingField,
    TypeMismatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedInput => write!(f, "malformed input"),
            ErrorKind::MissingField => write!(f, "missing field"),
            ErrorKind::TypeMismatch => write!(f, "type mismatch"),
        }
    }
}

/// Errors produced while turning raw input text into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The text is not valid JSON.
    #[error("malformed input at line {line}, column {column}: {message}")]
    MalformedInput {
        message: String,
        /// 1-based line of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
    },

    /// A required field is absent, `null`, or empty where non-empty is required.
    #[error("required field `{field}` is {absence}")]
    MissingField { field: String, absence: Absence },

    /// A field holds a value of the wrong semantic type.
    #[error("field `{field}` has the wrong type: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },
}

impl LoadError {
    pub(crate) fn absent(field: impl Into<String>) -> Self {
        LoadError::MissingField {
            field: field.into(),
            absence: Absence::Absent,
        }
    }

    pub(crate) fn empty(field: impl Into<String>) -> Self {
        LoadError::MissingField {
            field: field.into(),
            absence: Absence::Empty,
        }
    }

    pub(crate) fn mismatch(field: impl Into<String>, expected: &'static str, found: impl Into<String>) -> Self {
        LoadError::TypeMismatch {
            field: field.into(),
            expected,
            found: found.into(),
        }
    }

    /// Convert a JSON syntax error, keeping its position out of the message.
    pub(crate) fn from_json(err: &serde_json::Error) -> Self {
        let full = err.to_string();
        // serde_json appends " at line L column C" to every positioned message.
        let message = match full.rsplit_once(" at line ") {
            Some((head, _)) if err.line() > 0 => head.to_string(),
            _ => full,
        };
        LoadError::MalformedInput {
            message,
            line: err.line(),
            column: err.column(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::MalformedInput { .. } => ErrorKind::MalformedInput,
            LoadError::MissingField { .. } => ErrorKind::MissingField,
            LoadError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// The offending field path, if the error is about a field.
    pub fn field(&self) -> Option<&str> {
        match self {
            LoadError::MalformedInput { .. } => None,
            LoadError::MissingField { field, .. } | LoadError::TypeMismatch { field, .. } => Some(field),
        }
    }

    /// The 1-based `(line, column)` parse position, if the text itself was malformed.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            LoadError::MalformedInput { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = LoadError::absent("Scope");
        assert_eq!(err.to_string(), "required field `Scope` is missing");
        assert_eq!(LoadError::empty("Scope").to_string(), "required field `Scope` is empty");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = LoadError::mismatch("LabUserDatas", "array", "object");
        assert_eq!(
            err.to_string(),
            "field `LabUserDatas` has the wrong type: expected array, found object"
        );
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field(), Some("LabUserDatas"));
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_from_json_strips_position_suffix() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"Scope\": ").unwrap_err();
        let err = LoadError::from_json(&json_err);
        let LoadError::MalformedInput { message, line, column } = &err else {
            panic!("expected MalformedInput, got {err:?}");
        };
        assert!(!message.contains("at line"), "position leaked into message: {message}");
        assert_eq!(*line, 1);
        assert!(*column > 0);
        assert_eq!(err.field(), None);
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
}
