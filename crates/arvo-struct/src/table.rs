//! Two-column text rendering of a struct.

use std::fmt;

use crate::instance::ValueStruct;

const HEADINGS: [&str; 2] = ["attribute", "value"];

impl ValueStruct {
    /// Render a bordered `attribute | value` table, one row per attribute in
    /// declaration order.
    pub fn to_table(&self) -> String {
        let rows: Vec<(String, String)> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let key_width = rows
            .iter()
            .map(|(k, _)| k.chars().count())
            .chain([HEADINGS[0].len()])
            .max()
            .unwrap_or_default();
        let value_width = rows
            .iter()
            .map(|(_, v)| v.chars().count())
            .chain([HEADINGS[1].len()])
            .max()
            .unwrap_or_default();

        let rule = format!("+-{}-+-{}-+\n", "-".repeat(key_width), "-".repeat(value_width));
        let line = |k: &str, v: &str| format!("| {k:<key_width$} | {v:<value_width$} |\n");

        let mut out = String::new();
        out.push_str(&rule);
        out.push_str(&line(HEADINGS[0], HEADINGS[1]));
        out.push_str(&rule);
        for (k, v) in &rows {
            out.push_str(&line(k, v));
        }
        out.push_str(&rule);
        out
    }
}

impl fmt::Display for ValueStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{Schema, TypeSpec};

    #[test]
    fn renders_rows_in_declaration_order() {
        let schema = Schema::builder("TestValue")
            .attribute("string", TypeSpec::string())
            .attribute("integer", TypeSpec::integer())
            .attribute("optional_boolean", TypeSpec::bool().optional())
            .attribute("array_boolean", TypeSpec::array_of(TypeSpec::bool()))
            .build()
            .unwrap();
        let v = ValueStruct::from_json(
            &schema,
            &json!({"string": "string", "integer": 1, "array_boolean": [true, false]}),
        )
        .unwrap();

        let expected = "\
+------------------+---------------+
| attribute        | value         |
+------------------+---------------+
| string           | string        |
| integer          | 1             |
| optional_boolean |               |
| array_boolean    | [true, false] |
+------------------+---------------+
";
        assert_eq!(v.to_table(), expected);
        assert_eq!(v.to_string(), expected);
    }

    #[test]
    fn nested_struct_cell() {
        let schema = Schema::builder("Outer")
            .nested("inner", |b| b.attribute("x", TypeSpec::integer()))
            .build()
            .unwrap();
        let v = ValueStruct::from_json(&schema, &json!({"inner": {"x": 2}})).unwrap();
        assert!(v.to_table().contains("| inner     | {x: 2} |"));
    }
}
