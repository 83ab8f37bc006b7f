//! Conversion between JSON and `google.protobuf.Struct`.
//!
//! Filters without a dedicated protobuf message hand their per-route settings
//! to Envoy as a `Struct`.

use crate::errors::{FilterBindError, Result};
use prost_types::{value::Kind, ListValue, Struct, Value};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Convert a JSON object into a protobuf `Struct`.
pub fn struct_from_json(json: &JsonValue) -> Result<Struct> {
    match json {
        JsonValue::Object(map) => {
            let mut fields = BTreeMap::new();
            for (key, value) in map {
                fields.insert(key.clone(), json_to_proto_value(value)?);
            }
            Ok(Struct { fields })
        }
        other => Err(FilterBindError::serialization(format!(
            "per-filter configuration must be a JSON object, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn json_to_proto_value(json: &JsonValue) -> Result<Value> {
    let kind = match json {
        JsonValue::Null => Kind::NullValue(0),
        JsonValue::Bool(b) => Kind::BoolValue(*b),
        JsonValue::Number(n) => {
            // Struct only carries doubles
            let num = n.as_f64().ok_or_else(|| {
                FilterBindError::serialization(format!("Cannot convert number {} to f64", n))
            })?;
            Kind::NumberValue(num)
        }
        JsonValue::String(s) => Kind::StringValue(s.clone()),
        JsonValue::Array(arr) => {
            let values = arr.iter().map(json_to_proto_value).collect::<Result<Vec<_>>>()?;
            Kind::ListValue(ListValue { values })
        }
        JsonValue::Object(_) => Kind::StructValue(struct_from_json(json)?),
    };

    Ok(Value { kind: Some(kind) })
}

/// Convert a protobuf `Struct` back to JSON.
pub fn struct_to_json(s: &Struct) -> JsonValue {
    let map = s
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), proto_value_to_json(value)))
        .collect::<serde_json::Map<_, _>>();
    JsonValue::Object(map)
}

fn proto_value_to_json(value: &Value) -> JsonValue {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(*b),
        Some(Kind::NumberValue(n)) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Some(Kind::StringValue(s)) => JsonValue::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.iter().map(proto_value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => struct_to_json(s),
    }
}
