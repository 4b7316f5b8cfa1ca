//! Error types for attribute binding operations.

use arvo_struct::StructError;
use thiserror::Error;

/// Errors that can occur while reading or writing a bound attribute.
#[derive(Debug, Error)]
pub enum BindingError {
    /// An assigned value (or one of its elements) is not of the bound type.
    /// Nothing was written.
    #[error("type mismatch on `{attribute}`: expected {expected}, found {found}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        found: String,
    },

    /// The host's raw value does not have the shape the binding needs.
    #[error("raw value of `{attribute}` has the wrong shape: {reason}")]
    RawShape { attribute: String, reason: String },

    /// Two bindings were declared for the same attribute.
    #[error("attribute `{0}` is already bound")]
    DuplicateBinding(String),

    /// No binding is declared for the attribute.
    #[error("attribute `{0}` is not bound")]
    NotBound(String),

    /// Construction of the typed value failed.
    #[error(transparent)]
    Struct(#[from] StructError),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;
