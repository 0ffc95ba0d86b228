//! Document tree -> `serde_json::Value` conversion.

use crate::value::{Table, Value};

/// Convert a TOML value to `serde_json::Value`.
///
/// Datetimes become their normalized RFC 3339 string. Non-finite floats have
/// no JSON form and become `null`.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(value_to_json).collect()),
        Value::Table(table) => table_to_json(table),
    }
}

/// Convert a table to a JSON object, keeping key order.
pub fn table_to_json(table: &Table) -> serde_json::Value {
    serde_json::Value::Object(
        table
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}
