//! BSON to JSON conversion for search results.
//!
//! Aggregation results come back as raw [`Document`]s. Clients expect plain JSON: ObjectIds
//! as 24-char hex strings and dates as RFC 3339 strings, not the `{"$oid": ..}` /
//! `{"$date": ..}` wrappers of extended JSON.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// Converts a whole document.
pub fn document_to_json(document: Document) -> Value {
    let map: Map<String, Value> = document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();
    Value::Object(map)
}

/// Converts one value, recursing into documents and arrays.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Decimal128(d) => Value::String(d.to_string()),
        other => other.into_relaxed_extjson(),
    }
}
