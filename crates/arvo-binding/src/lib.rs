//! Typed attribute bindings over loosely-typed host records.
//!
//! A host record stores plain JSON maps (in any key casing) per attribute.
//! An [`AttributeBinding`] sits on top of the host's raw getter/setter pair
//! and exposes typed [`ValueStruct`](arvo_struct::ValueStruct)s instead.
//!
//! # Architecture
//!
//! - **Reads** normalize raw keys to snake_case, construct the struct (or
//!   array of structs), and memoize it under the raw slot's [`Generation`].
//!   Repeated reads return the same `Arc` until the raw slot is rewritten.
//! - **Writes** check the value against the bound schema, export it to a raw
//!   map, and memoize the written value itself.
//! - **Validation** runs each struct's field rules and re-registers failures
//!   on the host's [`ErrorSink`] as `attr/field` or `attr/index/field`.
//!
//! # Modules
//!
//! - [`error`] — Error types for binding operations
//! - [`names`] — Key normalization
//! - [`traits`] — The [`HostRecord`] and [`ErrorSink`] contracts
//! - [`memo`] — [`MemoCache`] and [`Generation`]
//! - [`binding`] — [`AttributeBinding`], [`BoundType`], [`Bound`]
//! - [`validation`] — [`Bindings`] registry and [`ValidationReport`]
//! - [`memory`] — In-memory [`InMemoryRecord`] for tests and embedding
//! - [`config`] — [`BindingConfig`]

pub mod binding;
pub mod config;
pub mod error;
pub mod memo;
pub mod memory;
pub mod names;
pub mod traits;
pub mod validation;

pub use binding::{AttributeBinding, Bound, BoundType};
pub use config::BindingConfig;
pub use error::{BindingError, Result};
pub use memo::{Generation, MemoCache, MemoSlot};
pub use memory::{Errors, InMemoryRecord, RecordError};
pub use names::{normalize_key, normalize_map, normalize_value};
pub use traits::{ErrorSink, HostRecord};
pub use validation::{Bindings, ValidationReport};
