//! JSON encoding of entity values
//!
//! Records encode as JSON objects of their non-null fields (the kind tag is a
//! server-side concern and is not sent), enum tags as strings. Decoding is the
//! schema-free direction: objects become mappings and arrays sequences.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::value::{EntityValue, Mapping};

impl Serialize for EntityValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityValue::Null => serializer.serialize_unit(),
            EntityValue::Bool(b) => serializer.serialize_bool(*b),
            EntityValue::Number(n) => n.serialize(serializer),
            EntityValue::String(s) | EntityValue::Enum(s) => serializer.serialize_str(s),
            EntityValue::Record(record) => {
                let present: Vec<_> = record.fields().filter(|(_, v)| !v.is_null()).collect();
                let mut map = serializer.serialize_map(Some(present.len()))?;
                for (name, value) in present {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            EntityValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            EntityValue::Mapping(mapping) => {
                let mut map = serializer.serialize_map(Some(mapping.len()))?;
                for (key, value) in mapping.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for EntityValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(EntityValue::from)
    }
}

impl From<Value> for EntityValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => EntityValue::Null,
            Value::Bool(b) => EntityValue::Bool(b),
            Value::Number(n) => EntityValue::Number(n),
            Value::String(s) => EntityValue::String(s),
            Value::Array(items) => {
                EntityValue::Sequence(items.into_iter().map(EntityValue::from).collect())
            }
            Value::Object(entries) => EntityValue::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, EntityValue::from(v)))
                    .collect::<Mapping>(),
            ),
        }
    }
}

impl EntityValue {
    /// Encode as a `serde_json::Value`
    pub fn to_json(&self) -> Value {
        match self {
            EntityValue::Null => Value::Null,
            EntityValue::Bool(b) => Value::Bool(*b),
            EntityValue::Number(n) => Value::Number(n.clone()),
            EntityValue::String(s) | EntityValue::Enum(s) => Value::String(s.clone()),
            EntityValue::Record(record) => Value::Object(
                record
                    .fields()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            EntityValue::Sequence(items) => {
                Value::Array(items.iter().map(EntityValue::to_json).collect())
            }
            EntityValue::Mapping(mapping) => Value::Object(
                mapping
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Record;
    use serde_json::json;

    #[test]
    fn test_record_serializes_present_fields_only() {
        let record = Record::new("nodeState")
            .with_field("executionState", EntityValue::enum_tag("EXECUTED"))
            .with_field("warning", EntityValue::Null);
        let encoded = serde_json::to_value(EntityValue::from(record)).unwrap();
        assert_eq!(encoded, json!({"executionState": "EXECUTED"}));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let value = EntityValue::sequence([
            EntityValue::from(Record::new("xy").with_field("x", 1).with_field("y", 2)),
            EntityValue::from(Mapping::new().with_entry("k", true)),
        ]);
        assert_eq!(serde_json::to_value(&value).unwrap(), value.to_json());
    }

    #[test]
    fn test_objects_decode_as_mappings() {
        let decoded: EntityValue =
            serde_json::from_value(json!({"a": [1, null], "b": null})).unwrap();
        let mapping = decoded.as_mapping().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get("a"),
            Some(&EntityValue::sequence([EntityValue::from(1), EntityValue::Null]))
        );
    }
}
