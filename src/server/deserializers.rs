use serde::{Deserialize, Deserializer};
use serde_json::Value;

// a non-numeric page behaves as if no page was given
pub fn deserialize_page_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(1))
}

// forms in the frontend send ids as strings, so "3" is as good as 3
pub fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Looks up `field` in a JSON object, treating null and the empty string the
/// same as a missing key.
pub fn present_field<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    match body.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        value => Some(value),
    }
}
