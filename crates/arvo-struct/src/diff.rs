//! Structural diff between two value structs.
//!
//! Attributes are matched by name, so structs of different schemas can be
//! compared. Nested structs on both sides are descended into; every other
//! value is compared whole.

use crate::instance::ValueStruct;
use crate::value::Value;

/// The result of comparing two structs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructDiff {
    /// The list of attribute changes, addressed by `/`-joined paths.
    pub changes: Vec<StructChange>,
}

impl StructDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of added attributes.
    pub fn additions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, StructChange::Added { .. }))
            .count()
    }

    /// Number of removed attributes.
    pub fn removals(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, StructChange::Removed { .. }))
            .count()
    }

    /// Number of modified attributes.
    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, StructChange::Modified { .. }))
            .count()
    }

    /// Paths of all changes, in discovery order.
    pub fn paths(&self) -> Vec<&str> {
        self.changes.iter().map(StructChange::path).collect()
    }
}

/// A single attribute-level change.
#[derive(Clone, Debug, PartialEq)]
pub enum StructChange {
    /// Attribute exists only in the newer struct.
    Added { path: String, value: Value },
    /// Attribute exists only in the older struct.
    Removed { path: String, value: Value },
    /// Attribute exists in both with different values.
    Modified { path: String, old: Value, new: Value },
}

impl StructChange {
    /// The path of the changed attribute.
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Modified { path, .. } => {
                path
            }
        }
    }
}

impl ValueStruct {
    /// Compute the changes that turn `self` into `other`.
    pub fn diff(&self, other: &ValueStruct) -> StructDiff {
        let mut changes = Vec::new();
        diff_into(self, other, "", &mut changes);
        StructDiff { changes }
    }
}

fn diff_into(old: &ValueStruct, new: &ValueStruct, prefix: &str, changes: &mut Vec<StructChange>) {
    let path_of = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        }
    };

    for (name, old_val) in old.iter() {
        match new.get(name) {
            Some(new_val) => match (old_val, new_val) {
                (Value::Struct(a), Value::Struct(b)) => diff_into(a, b, &path_of(name), changes),
                _ if old_val != new_val => changes.push(StructChange::Modified {
                    path: path_of(name),
                    old: old_val.clone(),
                    new: new_val.clone(),
                }),
                _ => {}
            },
            None => changes.push(StructChange::Removed {
                path: path_of(name),
                value: old_val.clone(),
            }),
        }
    }

    for (name, new_val) in new.iter() {
        if old.get(name).is_none() {
            changes.push(StructChange::Added {
                path: path_of(name),
                value: new_val.clone(),
            });
        }
    }
}
