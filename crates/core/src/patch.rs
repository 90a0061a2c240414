//! Merge-patch deserialization support.

use serde::{Deserialize, Deserializer};

/// Deserialize a field so an explicit `null` stays distinguishable from an
/// absent field.
///
/// Wrap the target in `Option<Option<T>>` and pair with `#[serde(default)]`:
/// an absent field stays `None`, `null` becomes `Some(None)`, and a value
/// becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        value: Option<Option<String>>,
    }

    #[test]
    fn test_absent_field_is_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.value, None);
    }

    #[test]
    fn test_null_field_is_some_none() {
        let patch: Patch = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(patch.value, Some(None));
    }

    #[test]
    fn test_present_field_is_some_some() {
        let patch: Patch = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(patch.value, Some(Some("x".to_string())));
    }
}
