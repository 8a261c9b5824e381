//! Canned values used when the declared type gives nothing to work with.

use serde_json::{json, Value};

/// Representative timestamp for `Date` and date-like names.
pub const EXAMPLE_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

/// Value for strings and for anything named generically.
pub const STRING_PLACEHOLDER: &str = "string";

/// Value for type syntax the synthesizer does not understand.
pub const UNKNOWN_PLACEHOLDER: &str = "unknown";

/// Value for a property with no type annotation, chosen from its name.
///
/// Patterns are checked in order against the lower-cased name.
pub fn value_for_property_name(name: &str) -> Value {
    let lower = name.to_lowercase();

    if lower.contains("email") {
        json!("user@example.com")
    } else if lower.contains("id") {
        json!(1)
    } else if lower.contains("date") || lower.contains("time") {
        json!(EXAMPLE_TIMESTAMP)
    } else if lower.contains("active") || lower.contains("enabled") {
        json!(true)
    } else if lower.contains("count") || lower.contains("number") {
        json!(10)
    } else if lower.contains("list") || lower.contains("array") {
        json!([])
    } else {
        json!(STRING_PLACEHOLDER)
    }
}

/// Example built from nothing but a type name, for bodies whose type was never found.
pub fn fallback_for_type_name(type_name: &str) -> Value {
    let lower = type_name.to_lowercase();

    if lower.contains("user") {
        json!({
            "name": "John Doe",
            "email": "john@example.com",
            "age": 30
        })
    } else if lower.contains("product") {
        json!({
            "name": "Product Name",
            "price": 99.99,
            "description": "Product description"
        })
    } else if lower.contains("create") || lower.contains("post") {
        json!({
            "name": "New Item",
            "description": "Item description"
        })
    } else if lower.contains("update") || lower.contains("put") || lower.contains("patch") {
        json!({
            "name": "Updated Name",
            "description": "Updated description"
        })
    } else {
        json!({
            "field1": "value1",
            "field2": "value2",
            "field3": "value3"
        })
    }
}

/// One-field object standing in for a reference that was not (or must not be) expanded.
pub fn reference_placeholder(type_name: &str) -> Value {
    let mut object = serde_json::Map::new();
    object.insert(type_name.to_lowercase(), json!("object"));
    Value::Object(object)
}
