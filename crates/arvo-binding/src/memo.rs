//! Per-record cache of typed values keyed by raw generation.

use std::collections::HashMap;
use std::fmt;

use crate::binding::Bound;

/// Stamp identifying one raw write to a host slot.
///
/// Two reads observing the same generation observed the same raw value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The generation following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Cached typed value for one attribute.
#[derive(Clone, Debug)]
pub struct MemoSlot {
    pub generation: Generation,
    pub value: Bound,
}

/// Single-slot-per-attribute memo cache.
///
/// A cached value is only returned while the host still reports the
/// generation it was stored under.
#[derive(Clone, Debug, Default)]
pub struct MemoCache {
    slots: HashMap<String, MemoSlot>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value for `attribute` if it was stored under `generation`.
    pub fn lookup(&self, attribute: &str, generation: Generation) -> Option<&Bound> {
        self.slots
            .get(attribute)
            .filter(|slot| slot.generation == generation)
            .map(|slot| &slot.value)
    }

    /// Replace the slot for `attribute`.
    pub fn store(&mut self, attribute: &str, generation: Generation, value: Bound) {
        self.slots
            .insert(attribute.to_string(), MemoSlot { generation, value });
    }

    /// Drop the slot for `attribute`. Returns `true` if one existed.
    pub fn invalidate(&mut self, attribute: &str) -> bool {
        self.slots.remove(attribute).is_some()
    }

    /// Drop every slot (host reload).
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arvo_struct::{Schema, TypeSpec, ValueStruct};
    use serde_json::json;

    use super::*;

    fn bound() -> Bound {
        let schema = Schema::builder("Memo")
            .attribute("x", TypeSpec::integer())
            .build()
            .unwrap();
        Bound::One(Arc::new(ValueStruct::from_json(&schema, &json!({"x": 1})).unwrap()))
    }

    #[test]
    fn lookup_requires_matching_generation() {
        let mut cache = MemoCache::new();
        let g = Generation::new(3);
        cache.store("foo", g, bound());
        assert!(cache.lookup("foo", g).is_some());
        assert!(cache.lookup("foo", g.next()).is_none());
        assert!(cache.lookup("bar", g).is_none());
    }

    #[test]
    fn store_replaces_slot() {
        let mut cache = MemoCache::new();
        cache.store("foo", Generation::new(1), bound());
        cache.store("foo", Generation::new(2), bound());
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("foo", Generation::new(1)).is_none());
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = MemoCache::new();
        cache.store("foo", Generation::new(1), bound());
        cache.store("bar", Generation::new(1), bound());
        assert!(cache.invalidate("foo"));
        assert!(!cache.invalidate("foo"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn generation_display() {
        assert_eq!(Generation::new(7).to_string(), "g7");
        assert_eq!(Generation::new(7).next().value(), 8);
    }
}
