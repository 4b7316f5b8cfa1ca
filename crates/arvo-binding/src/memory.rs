use std::collections::HashMap;

use serde_json::Value;

use crate::memo::{Generation, MemoCache};
use crate::traits::{ErrorSink, HostRecord};

/// A validation failure registered on a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordError {
    pub path: String,
    pub message: String,
}

/// Ordered collection of record errors.
#[derive(Clone, Debug, Default)]
pub struct Errors {
    entries: Vec<RecordError>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// First error registered under `path`.
    pub fn find(&self, path: &str) -> Option<&RecordError> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// All messages registered under `path`.
    pub fn messages_for(&self, path: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.path == path)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordError> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ErrorSink for Errors {
    fn register(&mut self, path: &str, message: &str) {
        self.entries.push(RecordError {
            path: path.to_string(),
            message: message.to_string(),
        });
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug)]
struct RawSlot {
    generation: Generation,
    value: Value,
}

/// In-memory host record.
///
/// Intended for tests and embedding. Raw values live in a `HashMap`; every
/// write draws a fresh generation from a record-wide counter.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecord {
    slots: HashMap<String, RawSlot>,
    last_generation: Generation,
    memo: MemoCache,
    errors: Errors,
}

impl InMemoryRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style raw write, for fixtures.
    pub fn with_raw(mut self, attribute: &str, raw: Value) -> Self {
        self.raw_set(attribute, raw);
        self
    }

    /// The stored raw value, bypassing any binding.
    pub fn raw(&self, attribute: &str) -> Option<&Value> {
        self.slots.get(attribute).map(|slot| &slot.value)
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Forget every memoized typed value, as after reloading from storage.
    pub fn reload(&mut self) {
        self.memo.clear();
    }

    /// Number of attributes that have been written.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl HostRecord for InMemoryRecord {
    fn raw_get(&self, attribute: &str) -> Option<(Generation, &Value)> {
        self.slots
            .get(attribute)
            .map(|slot| (slot.generation, &slot.value))
    }

    fn raw_set(&mut self, attribute: &str, raw: Value) -> Generation {
        self.last_generation = self.last_generation.next();
        self.slots.insert(
            attribute.to_string(),
            RawSlot {
                generation: self.last_generation,
                value: raw,
            },
        );
        self.last_generation
    }

    fn memo_cache(&mut self) -> &mut MemoCache {
        &mut self.memo
    }

    fn error_sink(&mut self) -> &mut dyn ErrorSink {
        &mut self.errors
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn raw_round_trip() {
        let mut record = InMemoryRecord::new();
        assert!(record.raw_get("foo").is_none());
        record.raw_set("foo", json!({"a": 1}));
        let (_, raw) = record.raw_get("foo").unwrap();
        assert_eq!(raw, &json!({"a": 1}));
        assert_eq!(record.raw("foo"), Some(&json!({"a": 1})));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn every_write_gets_a_new_generation() {
        let mut record = InMemoryRecord::new();
        let g1 = record.raw_set("foo", json!({"a": 1}));
        let g2 = record.raw_set("foo", json!({"a": 1}));
        let g3 = record.raw_set("bar", json!(null));
        assert!(g1 < g2 && g2 < g3);
        assert_eq!(record.raw_get("foo").unwrap().0, g2);
    }

    #[test]
    fn errors_collect_and_clear() {
        let mut record = InMemoryRecord::new();
        let sink = record.error_sink();
        sink.register("foo/bar", "can't be blank");
        sink.register("foo/bar", "is too short (minimum is 2)");
        assert!(!sink.is_empty());
        assert_eq!(record.errors().len(), 2);
        assert_eq!(
            record.errors().messages_for("foo/bar"),
            vec!["can't be blank", "is too short (minimum is 2)"]
        );
        assert!(record.errors().find("foo").is_none());
        record.error_sink().clear();
        assert!(record.errors().is_empty());
    }
}
