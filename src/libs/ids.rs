//! Identifier helpers shared by records and the backup pipeline.
//!
//! Record ids are store keys rendered as strings. Backup files written by
//! other tools sometimes carry them as JSON numbers, so deserialization accepts
//! either form.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Deserializes an optional id given as a string or an integer.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// Deserializes a list of ids given as strings or integers.
pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawId>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().map(String::from).collect())
}

/// Parses a caller-facing id into a store key.
pub fn parse_key(id: &str) -> Option<i64> {
    id.trim().parse::<i64>().ok()
}

/// Renders a raw JSON id the way the backup validator compares them:
/// strings as-is, null or missing as the empty string, anything else as JSON text.
pub fn value_to_id(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("42"), Some(42));
        assert_eq!(parse_key(" 7 "), Some(7));
        assert_eq!(parse_key("abc"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn test_value_to_id() {
        assert_eq!(value_to_id(Some(&json!("12"))), "12");
        assert_eq!(value_to_id(Some(&json!(12))), "12");
        assert_eq!(value_to_id(Some(&Value::Null)), "");
        assert_eq!(value_to_id(None), "");
    }
}
