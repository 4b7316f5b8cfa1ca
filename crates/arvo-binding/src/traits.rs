//! The host-record contract bindings operate over.
//!
//! A host is whatever owns the raw attribute storage: an ORM record, a
//! document wrapper, or [`InMemoryRecord`](crate::memory::InMemoryRecord) in
//! tests. Bindings never hold on to a host; every call borrows it exclusively.

use serde_json::Value;

use crate::memo::{Generation, MemoCache};

/// Raw storage, memo storage, and an error sink for one record instance.
pub trait HostRecord {
    /// The current raw value of `attribute` and the generation stamped on it
    /// by the write that stored it.
    ///
    /// Returns `None` if the attribute has never been written.
    fn raw_get(&self, attribute: &str) -> Option<(Generation, &Value)>;

    /// Store a raw value and return the new generation.
    ///
    /// Every call must return a generation different from any previously
    /// returned for the same attribute.
    fn raw_set(&mut self, attribute: &str, raw: Value) -> Generation;

    /// The memo cache owned by this record instance.
    fn memo_cache(&mut self) -> &mut MemoCache;

    /// Where nested validation failures are registered.
    fn error_sink(&mut self) -> &mut dyn ErrorSink;
}

/// Collects `(path, message)` validation failures for a host.
pub trait ErrorSink {
    /// Record one failure.
    fn register(&mut self, path: &str, message: &str);

    /// Drop all recorded failures.
    fn clear(&mut self);

    /// Returns `true` if no failure is recorded.
    fn is_empty(&self) -> bool;
}
