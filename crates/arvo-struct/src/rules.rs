//! Field-level validation rules.
//!
//! Rules are declared on a schema and evaluated against a constructed
//! instance. A failing rule is reported as a [`FieldError`]; it is data for
//! the caller to collect, never an `Err`.

use std::fmt;

use crate::value::Value;

/// A validation rule attached to one attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// Value must be non-null, and strings/arrays must be non-blank.
    Presence,
    /// Character count (strings) or element count (arrays) within bounds.
    /// Null values are skipped.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// String value must be one of the listed options. Null values are skipped.
    Inclusion(Vec<String>),
    /// Numeric value within bounds (inclusive). Null values are skipped.
    Range { min: Option<f64>, max: Option<f64> },
}

impl Rule {
    /// Evaluate the rule, returning the failure message if it does not hold.
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Self::Presence => is_blank(value).then(|| "can't be blank".to_string()),
            Self::Length { min, max } => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    _ => return None,
                };
                if let Some(min) = min {
                    if len < *min {
                        return Some(format!("is too short (minimum is {min})"));
                    }
                }
                if let Some(max) = max {
                    if len > *max {
                        return Some(format!("is too long (maximum is {max})"));
                    }
                }
                None
            }
            Self::Inclusion(options) => match value {
                Value::Null => None,
                Value::String(s) if options.iter().any(|o| o == s) => None,
                _ => Some("is not included in the list".to_string()),
            },
            Self::Range { min, max } => {
                let n = value.as_f64()?;
                if let Some(min) = min {
                    if n < *min {
                        return Some(format!("must be greater than or equal to {min}"));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Some(format!("must be less than or equal to {max}"));
                    }
                }
                None
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// A failed rule, addressed by `/`-joined attribute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub attribute: String,
    pub message: String,
}

impl FieldError {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Re-address the error under a parent segment.
    pub fn nest(self, parent: &str, separator: &str) -> Self {
        Self {
            attribute: format!("{parent}{separator}{}", self.attribute),
            message: self.message,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence() {
        assert!(Rule::Presence.check(&Value::Null).is_some());
        assert!(Rule::Presence.check(&Value::from("  ")).is_some());
        assert!(Rule::Presence.check(&Value::Array(vec![])).is_some());
        assert!(Rule::Presence.check(&Value::from("hi")).is_none());
        assert!(Rule::Presence.check(&Value::Bool(false)).is_none());
    }

    #[test]
    fn length_bounds() {
        let rule = Rule::Length {
            min: Some(2),
            max: Some(3),
        };
        assert_eq!(
            rule.check(&Value::from("a")).as_deref(),
            Some("is too short (minimum is 2)")
        );
        assert!(rule.check(&Value::from("abc")).is_none());
        assert!(rule.check(&Value::from("abcd")).is_some());
        assert!(rule.check(&Value::Null).is_none());
    }

    #[test]
    fn inclusion() {
        let rule = Rule::Inclusion(vec!["red".into(), "blue".into()]);
        assert!(rule.check(&Value::from("red")).is_none());
        assert!(rule.check(&Value::from("green")).is_some());
        assert!(rule.check(&Value::Null).is_none());
    }

    #[test]
    fn range() {
        let rule = Rule::Range {
            min: Some(0.0),
            max: Some(10.0),
        };
        assert!(rule.check(&Value::Integer(5)).is_none());
        assert!(rule.check(&Value::Integer(-1)).is_some());
        assert!(rule.check(&Value::Float(10.5)).is_some());
        assert!(rule.check(&Value::from("x")).is_none());
    }

    #[test]
    fn nest_prefixes_attribute() {
        let e = FieldError::new("foo", "can't be blank").nest("0", "/").nest("foos", "/");
        assert_eq!(e.attribute, "foos/0/foo");
        assert_eq!(e.to_string(), "foos/0/foo can't be blank");
    }
}
