//! Conversion of structs back into plain JSON maps.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as Json};

use crate::error::{StructError, StructResult};
use crate::instance::ValueStruct;

impl ValueStruct {
    /// Plain map of every attribute, nested structs and arrays converted
    /// recursively. Optional attributes appear as `null`.
    ///
    /// Feeding the result back into [`ValueStruct::new`] yields an equal
    /// instance.
    pub fn export_raw(&self) -> Map<String, Json> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.to_raw()))
            .collect()
    }

    /// Like [`ValueStruct::export_raw`] but null attributes are omitted at
    /// every depth.
    pub fn export_compact(&self) -> Map<String, Json> {
        self.iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| (name.to_string(), value.to_compact()))
            .collect()
    }

    /// JSON text of [`ValueStruct::export_compact`].
    pub fn to_compact_json(&self) -> StructResult<String> {
        serde_json::to_string(&Json::Object(self.export_compact()))
            .map_err(|e| StructError::Serialization(e.to_string()))
    }
}

impl Serialize for ValueStruct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value.to_raw())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, LazyLock};

    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::schema::{Schema, TypeSpec};

    static PROFILE: LazyLock<Arc<Schema>> = LazyLock::new(|| {
        Schema::builder("Profile")
            .attribute("name", TypeSpec::string())
            .attribute("nickname", TypeSpec::string().optional())
            .attribute("age", TypeSpec::integer().optional())
            .attribute("score", TypeSpec::float().optional())
            .attribute("verified", TypeSpec::bool().optional())
            .optional_nested("address", |b| {
                b.attribute("city", TypeSpec::string())
                    .attribute("zip", TypeSpec::string().optional())
            })
            .attribute(
                "tags",
                TypeSpec::array_of(TypeSpec::string()).optional(),
            )
            .build()
            .unwrap()
    });

    #[test]
    fn export_raw_fills_optionals_with_null() {
        let v = ValueStruct::from_json(&PROFILE, &json!({"name": "ada"})).unwrap();
        assert_eq!(
            Json::Object(v.export_raw()),
            json!({
                "name": "ada", "nickname": null, "age": null, "score": null,
                "verified": null, "address": null, "tags": null
            })
        );
    }

    #[test]
    fn export_raw_recurses_into_nested() {
        let v = ValueStruct::from_json(
            &PROFILE,
            &json!({"name": "ada", "address": {"city": "London"}, "tags": ["a"]}),
        )
        .unwrap();
        let raw = v.export_raw();
        assert_eq!(raw["address"], json!({"city": "London", "zip": null}));
        assert_eq!(raw["tags"], json!(["a"]));
    }

    #[test]
    fn compact_drops_nulls_recursively() {
        let v = ValueStruct::from_json(
            &PROFILE,
            &json!({"name": "ada", "address": {"city": "London"}}),
        )
        .unwrap();
        assert_eq!(
            Json::Object(v.export_compact()),
            json!({"name": "ada", "address": {"city": "London"}})
        );
        let text = v.to_compact_json().unwrap();
        let parsed: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"name": "ada", "address": {"city": "London"}}));
    }

    #[test]
    fn serialize_matches_export_raw() {
        let v = ValueStruct::from_json(&PROFILE, &json!({"name": "ada", "age": 36})).unwrap();
        assert_eq!(serde_json::to_value(&v).unwrap(), Json::Object(v.export_raw()));
    }

    fn any_score() -> impl Strategy<Value = Json> {
        prop_oneof![
            (-1000i64..1000).prop_map(|i| json!(i)),
            (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        ]
    }

    fn any_address() -> impl Strategy<Value = Json> {
        ("[A-Z][a-z]{0,8}", proptest::option::of("[0-9]{5}"))
            .prop_map(|(city, zip)| json!({"city": city, "zip": zip}))
    }

    #[test]
    fn integral_score_exports_unchanged() {
        let v = ValueStruct::from_json(&PROFILE, &json!({"name": "ada", "score": 3})).unwrap();
        assert_eq!(v.export_raw()["score"], json!(3));
    }

    proptest! {
        #[test]
        fn raw_export_reconstructs_equal_struct(
            name in "[a-z]{1,8}",
            nickname in proptest::option::of("[a-z]{0,8}"),
            age in proptest::option::of(0i64..150),
            score in proptest::option::of(any_score()),
            verified in proptest::option::of(any::<bool>()),
            address in proptest::option::of(any_address()),
            tags in proptest::option::of(proptest::collection::vec("[a-z]{1,4}", 0..4)),
        ) {
            let mut input = Map::new();
            input.insert("name".into(), json!(name));
            if let Some(n) = nickname { input.insert("nickname".into(), json!(n)); }
            if let Some(a) = age { input.insert("age".into(), json!(a)); }
            if let Some(s) = score { input.insert("score".into(), s); }
            if let Some(b) = verified { input.insert("verified".into(), json!(b)); }
            if let Some(a) = address { input.insert("address".into(), a); }
            if let Some(t) = tags { input.insert("tags".into(), json!(t)); }

            let v = ValueStruct::new(&PROFILE, &input).unwrap();
            let raw = v.export_raw();
            for (key, value) in &input {
                prop_assert_eq!(&raw[key], value);
            }
            for key in raw.keys().filter(|k| !input.contains_key(*k)) {
                prop_assert_eq!(&raw[key], &Json::Null);
            }
            prop_assert_eq!(ValueStruct::new(&PROFILE, &raw).unwrap(), v);
        }
    }
}
