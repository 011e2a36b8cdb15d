use std::path::PathBuf;
use thiserror::Error;

/// Error types for canonical JSON formatting and the command-line harness.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The schema reported something the formatter cannot act on
    #[error("Invalid schema state for field '{field}': {message}")]
    InvalidSchema { field: String, message: String },

    /// A well-known type instance violates that type's own invariants
    #[error("Malformed {type_name}: {message}")]
    MalformedWellKnown { type_name: String, message: String },

    /// Text containing an unpaired UTF-16 surrogate
    #[error("Invalid text at code unit {index}: {message}")]
    InvalidText { index: usize, message: String },

    /// I/O error with operation context
    #[error("{operation}{}: {source}", path.as_ref().map(|p| format!(" '{}'", p.display())).unwrap_or_default())]
    Io {
        operation: String,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization error
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Fixture document that does not describe a resolvable message
    #[error("Fixture error: {message}")]
    Fixture { message: String },
}

pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    // =========================================================================
    // Schema error constructors
    // =========================================================================

    /// Create an invalid schema error for a named field.
    #[must_use]
    pub fn invalid_schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an error for a value whose shape does not match the declared kind.
    #[must_use]
    pub fn value_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Self::invalid_schema(field, format!("expected {expected} value, found {found}"))
    }

    /// Create an error for a map key kind that has no JSON key form.
    #[must_use]
    pub fn invalid_map_key(field: &str, kind: impl std::fmt::Debug) -> Self {
        Self::invalid_schema(field, format!("invalid map key kind {kind:?}"))
    }

    // =========================================================================
    // Well-known type error constructors
    // =========================================================================

    /// Create a malformed well-known type error.
    #[must_use]
    pub fn malformed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedWellKnown {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create an error for a `google.protobuf.Value` with no kind set.
    #[must_use]
    pub fn value_kind_unset(type_name: &str) -> Self {
        Self::malformed(type_name, "Value message must contain a value for the oneof")
    }

    /// Create an error for a `google.protobuf.Value` holding an unknown case.
    #[must_use]
    pub fn unexpected_value_case(type_name: &str, number: u32) -> Self {
        Self::malformed(type_name, format!("unexpected case in struct field: {number}"))
    }

    // =========================================================================
    // Text error constructors
    // =========================================================================

    /// Create an invalid text error at a UTF-16 code unit index.
    #[must_use]
    pub fn invalid_text(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidText {
            index,
            message: message.into(),
        }
    }

    /// Create an error for a high surrogate with no low surrogate after it.
    #[must_use]
    pub fn unpaired_high_surrogate(index: usize) -> Self {
        Self::invalid_text(index, "high surrogate not followed by low surrogate")
    }

    /// Create an error for a low surrogate with no high surrogate before it.
    #[must_use]
    pub fn unpaired_low_surrogate(index: usize) -> Self {
        Self::invalid_text(index, "low surrogate not preceded by high surrogate")
    }

    // =========================================================================
    // I/O error constructors
    // =========================================================================

    /// Create an I/O error with path context.
    #[must_use]
    pub fn io(operation: impl Into<String>, path: Option<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// Create an error for file read failure.
    #[must_use]
    pub fn file_read(path: PathBuf, source: std::io::Error) -> Self {
        Self::io("Failed to read file", Some(path), source)
    }

    /// Create an error for file write failure.
    #[must_use]
    pub fn file_write(path: PathBuf, source: std::io::Error) -> Self {
        Self::io("Failed to write to file", Some(path), source)
    }

    /// Create an error for file creation failure.
    #[must_use]
    pub fn file_create(path: PathBuf, source: std::io::Error) -> Self {
        Self::io("Failed to create file", Some(path), source)
    }

    /// Create an error for stdin read failure.
    #[must_use]
    pub fn stdin_read(source: std::io::Error) -> Self {
        Self::io("Failed to read stdin", None, source)
    }

    /// Create an error for stdout write failure.
    #[must_use]
    pub fn stdout_write(source: std::io::Error) -> Self {
        Self::io("Failed to write to stdout", None, source)
    }

    // =========================================================================
    // JSON and fixture error constructors
    // =========================================================================

    /// Create a JSON error.
    #[must_use]
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create a JSON parse error.
    #[must_use]
    pub fn json_parse(err: &serde_json::Error) -> Self {
        Self::json(format!("Failed to parse JSON: {err}"))
    }

    /// Create a fixture error.
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for FormatError {
    fn from(err: std::io::Error) -> Self {
        Self::io("I/O error", None, err)
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}
