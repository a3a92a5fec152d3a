//! Structural validation of one record against the fixed record schema.
//!
//! Works on untyped JSON so that every problem can be reported with a field
//! path, instead of stopping at the first serde error.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use curator_core::{Pricing, ResourceType, Style};

/// Upper bound on `description`, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 300;

const REQUIRED: &[&str] = &[
    "name",
    "url",
    "type",
    "description",
    "topics",
    "style",
    "pricing",
];
const OPTIONAL: &[&str] = &["links", "introducer"];
const INTRODUCER_KEYS: &[&str] = &["name", "github", "x"];

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaError {
    /// Dotted field path (`links.github`, `topics[2]`); empty for the root.
    pub path: String,
    pub message: String,
}

impl SchemaError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validate `value` against the record schema. An empty result means valid.
pub fn validate_schema(value: &Value) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let Some(obj) = value.as_object() else {
        errors.push(SchemaError::new("", "record must be a JSON object"));
        return errors;
    };

    for key in REQUIRED {
        if !obj.contains_key(*key) {
            errors.push(SchemaError::new(*key, "missing required property"));
        }
    }
    for key in obj.keys() {
        if !REQUIRED.contains(&key.as_str()) && !OPTIONAL.contains(&key.as_str()) {
            errors.push(SchemaError::new(key.as_str(), "unknown property"));
        }
    }

    if let Some(name) = string_field(obj, "name", &mut errors) {
        if name.trim().is_empty() {
            errors.push(SchemaError::new("name", "must not be empty"));
        }
    }
    if let Some(url) = string_field(obj, "url", &mut errors) {
        check_uri("url", url, &mut errors);
    }

    let types: Vec<&str> = ResourceType::all().iter().map(|t| t.as_str()).collect();
    enum_field(obj, "type", &types, &mut errors);
    let styles: Vec<&str> = Style::all().iter().map(|s| s.as_str()).collect();
    enum_field(obj, "style", &styles, &mut errors);
    let pricings: Vec<&str> = Pricing::all().iter().map(|p| p.as_str()).collect();
    enum_field(obj, "pricing", &pricings, &mut errors);

    if let Some(description) = string_field(obj, "description", &mut errors) {
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_CHARS {
            errors.push(SchemaError::new(
                "description",
                format!("must be at most {MAX_DESCRIPTION_CHARS} characters (got {len})"),
            ));
        }
    }

    check_topics(obj, &mut errors);
    check_links(obj, &mut errors);
    check_introducer(obj, &mut errors);
    errors
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Returns the string at `key`; records a type error if present but not a string.
fn string_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    errors: &mut Vec<SchemaError>,
) -> Option<&'a str> {
    match obj.get(key)? {
        Value::String(s) => Some(s.as_str()),
        other => {
            errors.push(SchemaError::new(
                key,
                format!("must be a string, found {}", json_type(other)),
            ));
            None
        }
    }
}

fn enum_field(obj: &Map<String, Value>, key: &str, allowed: &[&str], errors: &mut Vec<SchemaError>) {
    if let Some(value) = string_field(obj, key, errors) {
        if !allowed.contains(&value) {
            errors.push(SchemaError::new(
                key,
                format!("'{value}' is not one of: {}", allowed.join(", ")),
            ));
        }
    }
}

fn check_uri(path: &str, value: &str, errors: &mut Vec<SchemaError>) {
    if let Err(err) = Url::parse(value) {
        errors.push(SchemaError::new(
            path,
            format!("'{value}' is not a valid URI ({err})"),
        ));
    }
}

fn check_topics(obj: &Map<String, Value>, errors: &mut Vec<SchemaError>) {
    let Some(value) = obj.get("topics") else {
        return;
    };
    let Some(topics) = value.as_array() else {
        errors.push(SchemaError::new(
            "topics",
            format!("must be an array, found {}", json_type(value)),
        ));
        return;
    };
    if topics.is_empty() {
        errors.push(SchemaError::new("topics", "must contain at least one topic"));
    }
    for (i, topic) in topics.iter().enumerate() {
        let path = format!("topics[{i}]");
        match topic {
            Value::String(s) if s.trim().is_empty() => {
                errors.push(SchemaError::new(path, "must not be empty"));
            }
            Value::String(_) => {}
            other => errors.push(SchemaError::new(
                path,
                format!("must be a string, found {}", json_type(other)),
            )),
        }
    }
}

fn check_links(obj: &Map<String, Value>, errors: &mut Vec<SchemaError>) {
    let Some(value) = obj.get("links") else {
        return;
    };
    let Some(links) = value.as_object() else {
        errors.push(SchemaError::new(
            "links",
            format!("must be an object, found {}", json_type(value)),
        ));
        return;
    };
    for (key, link) in links {
        let path = format!("links.{key}");
        match link {
            Value::String(s) => check_uri(&path, s, errors),
            other => errors.push(SchemaError::new(
                path,
                format!("must be a string, found {}", json_type(other)),
            )),
        }
    }
}

fn check_introducer(obj: &Map<String, Value>, errors: &mut Vec<SchemaError>) {
    let Some(value) = obj.get("introducer") else {
        return;
    };
    let Some(introducer) = value.as_object() else {
        errors.push(SchemaError::new(
            "introducer",
            format!("must be an object, found {}", json_type(value)),
        ));
        return;
    };
    for (key, field) in introducer {
        let path = format!("introducer.{key}");
        if !INTRODUCER_KEYS.contains(&key.as_str()) {
            errors.push(SchemaError::new(path, "unknown property"));
            continue;
        }
        if !field.is_string() {
            errors.push(SchemaError::new(
                path,
                format!("must be a string, found {}", json_type(field)),
            ));
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn valid() -> Value {
        json!({
            "name": "Rustlings",
            "url": "https://github.com/rust-lang/rustlings",
            "type": "tutorial",
            "description": "Small exercises to get you used to reading and writing Rust code.",
            "topics": ["rust", "exercises"],
            "style": "interactive",
            "pricing": "free",
            "links": { "github": "https://github.com/rust-lang/rustlings" },
            "introducer": { "name": "Ferris", "x": "@ferris" }
        })
    }

    fn paths(errors: &[SchemaError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn valid_record_has_no_errors() {
        assert_eq!(validate_schema(&valid()), vec![]);
    }

    #[test]
    fn optional_sections_may_be_absent() {
        let mut record = valid();
        let obj = record.as_object_mut().expect("object");
        obj.remove("links");
        obj.remove("introducer");
        assert!(validate_schema(&record).is_empty());
    }

    #[rstest]
    #[case("name")]
    #[case("url")]
    #[case("type")]
    #[case("description")]
    #[case("topics")]
    #[case("style")]
    #[case("pricing")]
    fn missing_required_field_is_named(#[case] field: &str) {
        let mut record = valid();
        record.as_object_mut().expect("object").remove(field);
        let errors = validate_schema(&record);
        assert_eq!(paths(&errors), vec![field]);
        assert!(errors[0].message.contains("missing"));
    }

    #[rstest]
    #[case("type", json!("podcast"))]
    #[case("style", json!("audio"))]
    #[case("pricing", json!("donation"))]
    #[case("type", json!(3))]
    fn wrong_enum_value_is_named(#[case] field: &str, #[case] value: Value) {
        let mut record = valid();
        record[field] = value;
        let errors = validate_schema(&record);
        assert_eq!(paths(&errors), vec![field]);
    }

    #[test]
    fn description_length_is_counted_in_chars() {
        let mut record = valid();
        record["description"] = json!("é".repeat(MAX_DESCRIPTION_CHARS));
        assert!(validate_schema(&record).is_empty());

        record["description"] = json!("x".repeat(MAX_DESCRIPTION_CHARS + 1));
        let errors = validate_schema(&record);
        assert_eq!(paths(&errors), vec!["description"]);
        assert!(errors[0].message.contains("301"));
    }

    #[test]
    fn bad_urls_are_reported_with_link_key() {
        let mut record = valid();
        record["url"] = json!("not a url");
        record["links"] = json!({ "github": "github.com/foo", "article": 5 });
        let errors = validate_schema(&record);
        assert_eq!(paths(&errors), vec!["url", "links.article", "links.github"]);
    }

    #[test]
    fn topics_must_be_non_empty_strings() {
        let mut record = valid();
        record["topics"] = json!([]);
        assert_eq!(paths(&validate_schema(&record)), vec!["topics"]);

        record["topics"] = json!(["rust", "", 7]);
        assert_eq!(
            paths(&validate_schema(&record)),
            vec!["topics[1]", "topics[2]"]
        );
    }

    #[test]
    fn unknown_properties_are_rejected() {
        let mut record = valid();
        record["rating"] = json!(5);
        record["introducer"] = json!({ "mastodon": "@x@y" });
        let errors = validate_schema(&record);
        assert_eq!(paths(&errors), vec!["rating", "introducer.mastodon"]);
    }

    #[test]
    fn non_object_root() {
        let errors = validate_schema(&json!(["nope"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "(root): record must be a JSON object");
    }
}
