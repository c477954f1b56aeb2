/// Lenient field deserializers for the loosely typed source files.
///
/// Source JSON was hand-edited and scraped, so a field documented as a string may hold a
/// number or `null`. These helpers never fail: the wrong type is treated as absent.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Identifier that may be written as a string or a number.
pub fn opt_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Array whose elements are decoded individually; elements of the wrong shape are dropped.
pub fn list_of<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Nested object decoded on its own; a value of the wrong shape is treated as absent.
pub fn opt_of<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => serde_json::from_value(value).ok(),
    })
}

pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

pub fn opt_score<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_f64()
        .map(|n| n.clamp(0.0, 10.0) as f32))
}

/// Non-empty trimmed text, or `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "opt_score")]
        score: Option<f32>,
    }

    #[test]
    fn wrong_types_become_absent() {
        let probe: Probe =
            serde_json::from_str(r#"{"name": 42, "tags": ["a", 1, "b"], "score": 14}"#).unwrap();
        assert_eq!(probe.name, None);
        assert_eq!(probe.tags, vec!["a", "b"]);
        assert_eq!(probe.score, Some(10.0));

        let probe: Probe = serde_json::from_str(r#"{"tags": "nope"}"#).unwrap();
        assert!(probe.tags.is_empty());
        assert_eq!(probe.score, None);
    }
}
