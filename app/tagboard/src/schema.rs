//! JSON Schema for the configuration file.

use crate::config::TagboardConfig;

/// Identifier embedded in the generated schema.
const SCHEMA_ID: &str = "https://tagboard.dev/tagboard.schema.json";

/// Generates a JSON Schema for the Tagboard configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(TagboardConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Generates the pretty-printed JSON Schema string.
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_schema_produces_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(&generate_schema_json()).unwrap();

        assert_eq!(parsed["$id"], SCHEMA_ID);
        assert_eq!(parsed["title"], "TagboardConfig");
        for section in ["server", "grid", "thumbnails", "logs"] {
            assert!(parsed["properties"][section].is_object(), "missing {section}");
        }
    }

    #[test]
    fn test_schema_uses_camel_case_keys() {
        let json = generate_schema_json();
        assert!(json.contains("baseUrl"));
        assert!(json.contains("aspectRatio"));
        assert!(json.contains("subscribeRetryMs"));
        assert!(!json.contains("base_url"));
    }
}
