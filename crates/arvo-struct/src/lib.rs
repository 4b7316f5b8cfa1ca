//! Schema-validated immutable value structs.
//!
//! A [`ValueStruct`] is built from a plain JSON map against a shared
//! [`Schema`] and never changes afterwards. This crate covers the typed half
//! of the value-object layer; `arvo-binding` wires structs to a host record's
//! raw storage.
//!
//! # Key Types
//!
//! - [`Schema`] / [`TypeSpec`] -- ordered attribute declarations
//! - [`ValueStruct`] -- construction, equality, `copy_with`, `dig`
//! - [`Value`] -- attribute values (primitives, null, arrays, nested structs)
//! - [`Rule`] / [`FieldError`] -- field-level validation rules
//! - [`StructDiff`] -- attribute-path diff between two structs
//!
//! # Design Rules
//!
//! 1. Every declared attribute is present after construction; omitted
//!    optionals hold null.
//! 2. Construction is all-or-nothing.
//! 3. Equality is structural, never by schema identity.
//! 4. `export_raw` is the inverse of construction.

pub mod diff;
pub mod error;
pub mod export;
pub mod instance;
pub mod rules;
pub mod schema;
pub mod table;
pub mod value;

pub use diff::{StructChange, StructDiff};
pub use error::{StructError, StructResult, ViolationReason};
pub use instance::ValueStruct;
pub use rules::{FieldError, Rule};
pub use schema::{Attribute, FieldRule, Kind, ScalarType, Schema, SchemaBuilder, TypeSpec};
pub use value::Value;
