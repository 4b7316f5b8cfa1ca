//! The immutable, schema-validated [`ValueStruct`].

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value as Json};
use tracing::trace;

use crate::error::{StructError, StructResult, ViolationReason};
use crate::rules::FieldError;
use crate::schema::{Kind, ScalarType, Schema, TypeSpec};
use crate::value::{json_type_name, Value};

/// An immutable structured value validated against a [`Schema`].
///
/// Every declared attribute is present after construction; optional
/// attributes that were omitted hold [`Value::Null`]. There are no setters:
/// [`ValueStruct::copy_with`] produces a new instance.
#[derive(Clone)]
pub struct ValueStruct {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl ValueStruct {
    /// Construct an instance from a map of canonical attribute names to raw
    /// values.
    ///
    /// Fails with [`StructError::SchemaViolation`] on unknown keys, missing or
    /// null required attributes, and values that do not match their declared
    /// type. Nothing is partially constructed.
    pub fn new(schema: &Arc<Schema>, attributes: &Map<String, Json>) -> StructResult<Self> {
        build(schema, attributes).inspect_err(|e| {
            trace!(schema = %schema.name(), error = %e, "construction rejected");
        })
    }

    /// Construct from any JSON value, which must be an object.
    pub fn from_json(schema: &Arc<Schema>, raw: &Json) -> StructResult<Self> {
        match raw {
            Json::Object(map) => Self::new(schema, map),
            other => Err(StructError::SchemaViolation {
                schema: schema.name().to_string(),
                path: String::new(),
                reason: ViolationReason::NotAMap {
                    found: json_type_name(other).to_string(),
                },
            }),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns `true` if `self` was built against exactly `schema`.
    pub fn is_instance_of(&self, schema: &Arc<Schema>) -> bool {
        Arc::ptr_eq(&self.schema, schema)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_struct(&self, name: &str) -> Option<&ValueStruct> {
        self.get(name).and_then(Value::as_struct)
    }

    /// Attributes in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.schema
            .attributes()
            .iter()
            .zip(&self.values)
            .map(|(a, v)| (a.name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a new instance from this one's attributes merged with
    /// `overrides`, re-running full construction.
    ///
    /// Every override key must already be an attribute of this struct.
    pub fn copy_with<I, K>(&self, overrides: I) -> StructResult<Self>
    where
        I: IntoIterator<Item = (K, Json)>,
        K: Into<String>,
    {
        let mut merged = self.export_raw();
        for (key, value) in overrides {
            let key = key.into();
            if !self.schema.contains(&key) {
                return Err(StructError::UnknownOverride {
                    schema: self.schema.name().to_string(),
                    attribute: key,
                });
            }
            merged.insert(key, value);
        }
        Self::new(&self.schema, &merged)
    }

    /// Resolve a sequence of attribute names, descending into nested structs.
    ///
    /// An empty path, an undeclared name, or a path that continues past a
    /// non-struct value fails with [`StructError::NoSuchAttribute`].
    pub fn dig(&self, path: &[&str]) -> StructResult<&Value> {
        let (first, rest) = path.split_first().ok_or_else(|| StructError::NoSuchAttribute {
            path: String::new(),
            segment: String::new(),
        })?;
        let mut current = self.get(first).ok_or_else(|| StructError::NoSuchAttribute {
            path: String::new(),
            segment: first.to_string(),
        })?;
        let mut walked = first.to_string();
        for segment in rest {
            current = current
                .as_struct()
                .and_then(|s| s.get(segment))
                .ok_or_else(|| StructError::NoSuchAttribute {
                    path: walked.clone(),
                    segment: segment.to_string(),
                })?;
            walked.push('/');
            walked.push_str(segment);
        }
        Ok(current)
    }

    /// Evaluate the schema's field rules, recursing into nested structs and
    /// arrays of structs. Errors are addressed by `/`-joined paths.
    pub fn validate(&self) -> Vec<FieldError> {
        self.validate_with("/")
    }

    /// [`ValueStruct::validate`] with a custom path separator.
    pub fn validate_with(&self, separator: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field_rule in self.schema.rules() {
            let Some(value) = self.get(&field_rule.attribute) else {
                continue;
            };
            if let Some(message) = field_rule.rule.check(value) {
                errors.push(FieldError::new(field_rule.attribute.clone(), message));
            }
        }
        for (name, value) in self.iter() {
            match value {
                Value::Struct(nested) => errors.extend(
                    nested
                        .validate_with(separator)
                        .into_iter()
                        .map(|e| e.nest(name, separator)),
                ),
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        if let Value::Struct(nested) = item {
                            let index = index.to_string();
                            errors.extend(nested.validate_with(separator).into_iter().map(
                                |e| e.nest(&index, separator).nest(name, separator),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn build(schema: &Arc<Schema>, attributes: &Map<String, Json>) -> StructResult<ValueStruct> {
    if let Some(unknown) = attributes.keys().find(|k| !schema.contains(k)) {
        return Err(violation(schema, unknown, ViolationReason::UnknownAttribute));
    }
    let mut values = Vec::with_capacity(schema.len());
    for attribute in schema.attributes() {
        let value = coerce(schema, &attribute.spec, attributes.get(&attribute.name))
            .map_err(|e| e.within(&attribute.name))?;
        values.push(value);
    }
    Ok(ValueStruct {
        schema: Arc::clone(schema),
        values,
    })
}

fn violation(schema: &Schema, path: &str, reason: ViolationReason) -> StructError {
    StructError::SchemaViolation {
        schema: schema.name().to_string(),
        path: path.to_string(),
        reason,
    }
}

/// Type-check one raw value. Violations carry a path relative to the value.
fn coerce(owner: &Schema, spec: &TypeSpec, raw: Option<&Json>) -> StructResult<Value> {
    let raw = match raw {
        None if spec.required => return Err(violation(owner, "", ViolationReason::Missing)),
        Some(Json::Null) if spec.required => {
            return Err(violation(owner, "", ViolationReason::Null));
        }
        None | Some(Json::Null) => return Ok(Value::Null),
        Some(raw) => raw,
    };
    let wrong_type = || {
        violation(
            owner,
            "",
            ViolationReason::WrongType {
                expected: spec.describe(),
                found: json_type_name(raw).to_string(),
            },
        )
    };
    match &spec.kind {
        Kind::Scalar(scalar) => coerce_scalar(*scalar, raw).ok_or_else(wrong_type),
        Kind::ArrayOf(inner) => {
            let items = raw.as_array().ok_or_else(wrong_type)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    coerce(owner, inner, Some(item)).map_err(|e| e.within(&i.to_string()))
                })
                .collect::<StructResult<Vec<_>>>()
                .map(Value::Array)
        }
        Kind::Nested(child) => ValueStruct::from_json(child, raw).map(Value::Struct),
    }
}

fn coerce_scalar(scalar: ScalarType, raw: &Json) -> Option<Value> {
    match (scalar, raw) {
        (ScalarType::String | ScalarType::Any, Json::String(s)) => Some(Value::String(s.clone())),
        (ScalarType::Bool | ScalarType::Any, Json::Bool(b)) => Some(Value::Bool(*b)),
        (ScalarType::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        // Integral input stays integral so the raw export reproduces it.
        (ScalarType::Float | ScalarType::Any, Json::Number(n)) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Float)),
        _ => None,
    }
}

/// Structural equality: same attribute names, pairwise equal values.
/// The schemas need not be the same `Arc`.
impl PartialEq for ValueStruct {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name).is_some_and(|o| o == value))
    }
}

impl fmt::Debug for ValueStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name());
        for (name, value) in self.iter() {
            s.field(name, value);
        }
        s.finish()
    }
}
