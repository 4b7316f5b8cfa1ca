//! Read/write adapter between a host's raw attribute and typed structs.

use std::borrow::Cow;
use std::sync::Arc;

use arvo_struct::{FieldError, Schema, ValueStruct};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::BindingConfig;
use crate::error::{BindingError, Result};
use crate::names::normalize_value;
use crate::traits::HostRecord;

/// The declared type of a bound attribute.
#[derive(Clone, Debug)]
pub enum BoundType {
    /// A single struct of this schema.
    One(Arc<Schema>),
    /// An array of structs of this schema.
    Many(Arc<Schema>),
}

impl BoundType {
    pub fn one(schema: &Arc<Schema>) -> Self {
        Self::One(Arc::clone(schema))
    }

    pub fn many(schema: &Arc<Schema>) -> Self {
        Self::Many(Arc::clone(schema))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        match self {
            Self::One(schema) | Self::Many(schema) => schema,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::One(schema) => schema.name().to_string(),
            Self::Many(schema) => format!("array of {}", schema.name()),
        }
    }
}

/// A typed value read from or written to a binding.
///
/// Identity is pointer identity of the `Arc`s: a memoized read hands back the
/// very same allocation.
#[derive(Clone, Debug)]
pub enum Bound {
    One(Arc<ValueStruct>),
    Many(Arc<[Arc<ValueStruct>]>),
}

impl Bound {
    pub fn as_one(&self) -> Option<&Arc<ValueStruct>> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Arc<ValueStruct>]> {
        match self {
            Self::One(_) => None,
            Self::Many(items) => Some(items),
        }
    }

    /// Returns `true` if both hold the same allocation.
    pub fn ptr_eq(&self, other: &Bound) -> bool {
        match (self, other) {
            (Self::One(a), Self::One(b)) => Arc::ptr_eq(a, b),
            (Self::Many(a), Self::Many(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Raw form handed to the host's setter.
    pub fn to_raw(&self) -> Value {
        match self {
            Self::One(s) => Value::Object(s.export_raw()),
            Self::Many(items) => {
                Value::Array(items.iter().map(|s| Value::Object(s.export_raw())).collect())
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::One(s) => s.schema().name().to_string(),
            Self::Many(_) => "array".to_string(),
        }
    }
}

/// Structural equality, element by element.
impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::One(a), Self::One(b)) => a == b,
            (Self::Many(a), Self::Many(b)) => a == b,
            _ => false,
        }
    }
}

impl From<ValueStruct> for Bound {
    fn from(s: ValueStruct) -> Self {
        Self::One(Arc::new(s))
    }
}

impl From<Arc<ValueStruct>> for Bound {
    fn from(s: Arc<ValueStruct>) -> Self {
        Self::One(s)
    }
}

impl From<Vec<Arc<ValueStruct>>> for Bound {
    fn from(items: Vec<Arc<ValueStruct>>) -> Self {
        Self::Many(items.into())
    }
}

impl From<Vec<ValueStruct>> for Bound {
    fn from(items: Vec<ValueStruct>) -> Self {
        Self::Many(items.into_iter().map(Arc::new).collect())
    }
}

/// Binds one host attribute to a [`BoundType`].
#[derive(Clone, Debug)]
pub struct AttributeBinding {
    attribute: String,
    ty: BoundType,
    config: BindingConfig,
}

impl AttributeBinding {
    pub fn new(attribute: impl Into<String>, ty: BoundType) -> Self {
        Self::with_config(attribute, ty, BindingConfig::default())
    }

    pub fn with_config(attribute: impl Into<String>, ty: BoundType, config: BindingConfig) -> Self {
        Self {
            attribute: attribute.into(),
            ty,
            config,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn bound_type(&self) -> &BoundType {
        &self.ty
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Read the typed value.
    ///
    /// Returns `Ok(None)` for an unset or null raw value. While the host's
    /// raw generation is unchanged, repeated reads return the same `Arc`s.
    /// Construction failures propagate and nothing is cached.
    pub fn get<H: HostRecord + ?Sized>(&self, host: &mut H) -> Result<Option<Bound>> {
        let generation = match host.raw_get(&self.attribute) {
            Some((_, Value::Null)) | None => return Ok(None),
            Some((generation, _)) => generation,
        };

        if self.config.memoize {
            if let Some(hit) = host.memo_cache().lookup(&self.attribute, generation) {
                trace!(attribute = %self.attribute, %generation, "memo hit");
                return Ok(Some(hit.clone()));
            }
        }

        let bound = match host.raw_get(&self.attribute) {
            Some((_, raw)) => self.construct(raw)?,
            None => return Ok(None),
        };
        debug!(attribute = %self.attribute, %generation, "constructed from raw");

        if self.config.memoize {
            host.memo_cache()
                .store(&self.attribute, generation, bound.clone());
        }
        Ok(Some(bound))
    }

    /// Write a typed value, or clear the attribute with `None`.
    ///
    /// The value must match the bound type exactly (same schema, single vs.
    /// array). On mismatch nothing is written and the memo is untouched.
    /// On success the value itself is memoized, so the next read returns it.
    pub fn set<H: HostRecord + ?Sized>(&self, host: &mut H, value: Option<Bound>) -> Result<()> {
        let Some(value) = value else {
            host.raw_set(&self.attribute, Value::Null);
            host.memo_cache().invalidate(&self.attribute);
            debug!(attribute = %self.attribute, "cleared");
            return Ok(());
        };
        self.check_type(&value)?;

        let generation = host.raw_set(&self.attribute, value.to_raw());
        if self.config.memoize {
            host.memo_cache().store(&self.attribute, generation, value);
        } else {
            host.memo_cache().invalidate(&self.attribute);
        }
        debug!(attribute = %self.attribute, %generation, "assigned");
        Ok(())
    }

    /// Assign a raw map (or array of raw maps): keys are normalized, the
    /// typed value is constructed, then written as by [`AttributeBinding::set`].
    ///
    /// Raw input that is not a map where a struct is expected fails with
    /// [`BindingError::TypeMismatch`].
    pub fn assign_raw<H: HostRecord + ?Sized>(&self, host: &mut H, raw: &Value) -> Result<()> {
        if raw.is_null() {
            return self.set(host, None);
        }
        let misshapen = match (&self.ty, raw) {
            (BoundType::One(_), Value::Object(_)) => None,
            (BoundType::Many(_), Value::Array(items)) => items
                .iter()
                .position(|item| !item.is_object())
                .map(|i| format!("element {i} of type {}", json_kind(&items[i]))),
            (_, other) => Some(json_kind(other).to_string()),
        };
        if let Some(found) = misshapen {
            return Err(BindingError::TypeMismatch {
                attribute: self.attribute.clone(),
                expected: self.ty.describe(),
                found,
            });
        }
        let bound = self.construct(raw)?;
        self.set(host, Some(bound))
    }

    /// Field-rule failures of the current value, addressed
    /// `<attribute>/<path>` or `<attribute>/<index>/<path>`.
    pub fn nested_errors<H: HostRecord + ?Sized>(&self, host: &mut H) -> Result<Vec<FieldError>> {
        let sep = self.config.path_separator.as_str();
        let errors = match self.get(host)? {
            None => Vec::new(),
            Some(Bound::One(s)) => s
                .validate_with(sep)
                .into_iter()
                .map(|e| e.nest(&self.attribute, sep))
                .collect(),
            Some(Bound::Many(items)) => items
                .iter()
                .enumerate()
                .flat_map(|(index, s)| {
                    let index = index.to_string();
                    s.validate_with(sep)
                        .into_iter()
                        .map(move |e| e.nest(&index, sep))
                })
                .map(|e| e.nest(&self.attribute, sep))
                .collect(),
        };
        Ok(errors)
    }

    fn construct(&self, raw: &Value) -> Result<Bound> {
        let raw = if self.config.normalize_keys {
            trace!(attribute = %self.attribute, "normalizing raw keys");
            Cow::Owned(normalize_value(raw))
        } else {
            Cow::Borrowed(raw)
        };
        match (&self.ty, &*raw) {
            (BoundType::One(schema), Value::Object(map)) => {
                Ok(Bound::One(Arc::new(ValueStruct::new(schema, map)?)))
            }
            (BoundType::Many(schema), Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| -> Result<Arc<ValueStruct>> {
                    let map = self.expect_map(item, Some(index))?;
                    Ok(Arc::new(ValueStruct::new(schema, map)?))
                })
                .collect::<Result<Vec<_>>>()
                .map(Bound::from),
            (BoundType::One(_), other) => Err(self.shape_error(other, None)),
            (BoundType::Many(_), other) => Err(BindingError::RawShape {
                attribute: self.attribute.clone(),
                reason: format!("expected an array, found {}", json_kind(other)),
            }),
        }
    }

    fn expect_map<'v>(&self, raw: &'v Value, index: Option<usize>) -> Result<&'v Map<String, Value>> {
        raw.as_object().ok_or_else(|| self.shape_error(raw, index))
    }

    fn shape_error(&self, raw: &Value, index: Option<usize>) -> BindingError {
        let reason = match index {
            Some(i) => format!("element {i} is {}", json_kind(raw)),
            None => format!("expected a map, found {}", json_kind(raw)),
        };
        BindingError::RawShape {
            attribute: self.attribute.clone(),
            reason,
        }
    }

    fn check_type(&self, value: &Bound) -> Result<()> {
        let mismatch = |found: String| BindingError::TypeMismatch {
            attribute: self.attribute.clone(),
            expected: self.ty.describe(),
            found,
        };
        match (&self.ty, value) {
            (BoundType::One(schema), Bound::One(s)) if s.is_instance_of(schema) => Ok(()),
            (BoundType::Many(schema), Bound::Many(items)) => {
                match items.iter().position(|s| !s.is_instance_of(schema)) {
                    Some(index) => Err(mismatch(format!(
                        "element {index} of type {}",
                        items[index].schema().name()
                    ))),
                    None => Ok(()),
                }
            }
            (_, other) => Err(mismatch(other.describe())),
        }
    }
}

fn json_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}
