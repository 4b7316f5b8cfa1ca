//! Error types for value struct operations.

use std::fmt;

use thiserror::Error;

/// Why a construction call rejected its input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationReason {
    /// A required attribute was not supplied.
    Missing,
    /// A required attribute was supplied as `null`.
    Null,
    /// The supplied value does not match the declared type.
    WrongType { expected: String, found: String },
    /// The key is not declared by the schema.
    UnknownAttribute,
    /// A nested attribute (or the whole input) was not a map.
    NotAMap { found: String },
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "required attribute is missing"),
            Self::Null => write!(f, "required attribute is null"),
            Self::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::UnknownAttribute => write!(f, "unknown attribute"),
            Self::NotAMap { found } => write!(f, "expected a map, found {found}"),
        }
    }
}

/// Errors that can occur while building, querying, or exporting value structs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructError {
    /// Construction rejected the input. `path` is the `/`-joined attribute
    /// path from the outermost struct down to the offending value.
    #[error("schema violation in {schema} at `{path}`: {reason}")]
    SchemaViolation {
        schema: String,
        path: String,
        reason: ViolationReason,
    },

    /// `copy_with` was given an override key the struct does not declare.
    #[error("cannot copy {schema} with attribute `{attribute}`: no such attribute")]
    UnknownOverride { schema: String, attribute: String },

    /// A dig path segment could not be resolved.
    #[error("no such attribute `{segment}` at `{path}`")]
    NoSuchAttribute { path: String, segment: String },

    /// The schema definition itself is inconsistent.
    #[error("invalid schema {schema}: {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// Serialization to text failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StructError {
    /// Prefix the violation path with a parent attribute segment.
    ///
    /// Non-violation errors pass through untouched.
    pub(crate) fn within(self, parent: &str) -> Self {
        match self {
            Self::SchemaViolation {
                schema,
                path,
                reason,
            } => Self::SchemaViolation {
                schema,
                path: if path.is_empty() {
                    parent.to_string()
                } else {
                    format!("{parent}/{path}")
                },
                reason,
            },
            other => other,
        }
    }

    /// Returns `true` for construction failures.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. })
    }
}

/// Result alias for value struct operations.
pub type StructResult<T> = Result<T, StructError>;
