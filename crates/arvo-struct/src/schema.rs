//! Attribute schemas: the static type description every struct is built against.
//!
//! A [`Schema`] is an ordered list of `(name, TypeSpec)` pairs plus the
//! field-level validation rules declared for the type. Schemas are assembled
//! once with [`SchemaBuilder`] and shared as `Arc<Schema>` by every instance.

use std::fmt;
use std::sync::Arc;

use crate::error::{StructError, StructResult};
use crate::rules::Rule;

/// Primitive attribute types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    /// JSON numbers representable as `i64`.
    Integer,
    /// Any JSON number; integral input is kept as an integer.
    Float,
    Bool,
    /// Any non-null primitive.
    Any,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Any => "primitive",
        };
        f.write_str(name)
    }
}

/// The shape of an attribute's value.
#[derive(Clone, Debug)]
pub enum Kind {
    Scalar(ScalarType),
    ArrayOf(Box<TypeSpec>),
    Nested(Arc<Schema>),
}

/// Declared type of a single attribute.
#[derive(Clone, Debug)]
pub struct TypeSpec {
    pub kind: Kind,
    pub required: bool,
}

impl TypeSpec {
    /// A required scalar.
    pub fn scalar(scalar: ScalarType) -> Self {
        Self {
            kind: Kind::Scalar(scalar),
            required: true,
        }
    }

    pub fn string() -> Self {
        Self::scalar(ScalarType::String)
    }

    pub fn integer() -> Self {
        Self::scalar(ScalarType::Integer)
    }

    pub fn float() -> Self {
        Self::scalar(ScalarType::Float)
    }

    pub fn bool() -> Self {
        Self::scalar(ScalarType::Bool)
    }

    pub fn any() -> Self {
        Self::scalar(ScalarType::Any)
    }

    /// A required array whose elements all satisfy `inner`.
    pub fn array_of(inner: TypeSpec) -> Self {
        Self {
            kind: Kind::ArrayOf(Box::new(inner)),
            required: true,
        }
    }

    /// A required nested struct.
    pub fn nested(schema: Arc<Schema>) -> Self {
        Self {
            kind: Kind::Nested(schema),
            required: true,
        }
    }

    /// Mark the attribute optional: absent or `null` is accepted and stored
    /// as null.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Human-readable type name used in violation messages.
    pub fn describe(&self) -> String {
        let base = match &self.kind {
            Kind::Scalar(s) => s.to_string(),
            Kind::ArrayOf(inner) => format!("array of {}", inner.describe()),
            Kind::Nested(schema) => schema.name().to_string(),
        };
        if self.required {
            base
        } else {
            format!("optional {base}")
        }
    }
}

/// A declared attribute.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub name: String,
    pub spec: TypeSpec,
}

/// A rule bound to one attribute.
#[derive(Clone, Debug)]
pub struct FieldRule {
    pub attribute: String,
    pub rule: Rule,
}

/// Ordered attribute schema for one value struct type.
#[derive(Debug)]
pub struct Schema {
    name: String,
    attributes: Vec<Attribute>,
    rules: Vec<FieldRule>,
}

impl Schema {
    /// Start declaring a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            attributes: Vec::new(),
            rules: Vec::new(),
            error: None,
        }
    }

    /// The struct type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Field rules in declaration order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Position of an attribute in declaration order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns `true` if the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if no attributes are declared.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Builder for [`Schema`].
///
/// Declaration errors (duplicate attributes, rules on undeclared attributes)
/// are recorded and reported by [`SchemaBuilder::build`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    attributes: Vec<Attribute>,
    rules: Vec<FieldRule>,
    error: Option<StructError>,
}

impl SchemaBuilder {
    /// Declare an attribute.
    pub fn attribute(mut self, name: impl Into<String>, spec: TypeSpec) -> Self {
        let name = name.into();
        if self.attributes.iter().any(|a| a.name == name) {
            self.fail(format!("attribute `{name}` declared twice"));
            return self;
        }
        self.attributes.push(Attribute { name, spec });
        self
    }

    /// Declare a required nested struct whose schema is defined inline.
    ///
    /// The child schema is named `<Parent>::<attribute>`.
    pub fn nested<F>(self, name: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        self.nested_with(name, false, define)
    }

    /// Like [`SchemaBuilder::nested`] but the attribute is optional.
    pub fn optional_nested<F>(self, name: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        self.nested_with(name, true, define)
    }

    fn nested_with<F>(mut self, name: impl Into<String>, optional: bool, define: F) -> Self
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        let name = name.into();
        let child = define(Schema::builder(format!("{}::{}", self.name, name)));
        match child.build() {
            Ok(schema) => {
                let spec = TypeSpec::nested(schema);
                let spec = if optional { spec.optional() } else { spec };
                self.attribute(name, spec)
            }
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(e);
                }
                self
            }
        }
    }

    /// Attach a field-level validation rule to a declared attribute.
    pub fn validates(mut self, attribute: impl Into<String>, rule: Rule) -> Self {
        let attribute = attribute.into();
        if !self.attributes.iter().any(|a| a.name == attribute) {
            self.fail(format!("rule declared for unknown attribute `{attribute}`"));
            return self;
        }
        self.rules.push(FieldRule { attribute, rule });
        self
    }

    fn fail(&mut self, reason: String) {
        if self.error.is_none() {
            self.error = Some(StructError::InvalidSchema {
                schema: self.name.clone(),
                reason,
            });
        }
    }

    /// Finish the schema.
    pub fn build(self) -> StructResult<Arc<Schema>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(Arc::new(Schema {
            name: self.name,
            attributes: self.attributes,
            rules: self.rules,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_declaration_order() {
        let schema = Schema::builder("Ordered")
            .attribute("b", TypeSpec::string())
            .attribute("a", TypeSpec::integer())
            .attribute("c", TypeSpec::bool().optional())
            .build()
            .unwrap();
        let names: Vec<&str> = schema.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(schema.index_of("a"), Some(1));
        assert!(!schema.attribute("c").unwrap().spec.required);
    }

    #[test]
    fn rejects_duplicate_attribute() {
        let err = Schema::builder("Dup")
            .attribute("a", TypeSpec::string())
            .attribute("a", TypeSpec::integer())
            .build()
            .unwrap_err();
        assert!(matches!(err, StructError::InvalidSchema { .. }));
    }

    #[test]
    fn rejects_rule_for_unknown_attribute() {
        let err = Schema::builder("Rules")
            .attribute("a", TypeSpec::string())
            .validates("b", Rule::Presence)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unknown attribute `b`"));
    }

    #[test]
    fn nested_schema_is_named_after_parent() {
        let schema = Schema::builder("Parent")
            .nested("child", |b| b.attribute("x", TypeSpec::string()))
            .build()
            .unwrap();
        match &schema.attribute("child").unwrap().spec.kind {
            Kind::Nested(child) => assert_eq!(child.name(), "Parent::child"),
            other => panic!("expected nested kind, got {other:?}"),
        }
    }

    #[test]
    fn nested_errors_surface_on_parent_build() {
        let err = Schema::builder("Parent")
            .nested("child", |b| {
                b.attribute("x", TypeSpec::string())
                    .attribute("x", TypeSpec::string())
            })
            .build()
            .unwrap_err();
        match err {
            StructError::InvalidSchema { schema, .. } => assert_eq!(schema, "Parent::child"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn describe_types() {
        assert_eq!(TypeSpec::array_of(TypeSpec::bool()).describe(), "array of bool");
        assert_eq!(TypeSpec::string().optional().describe(), "optional string");
    }
}
