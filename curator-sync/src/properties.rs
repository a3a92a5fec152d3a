//! Mapping from a [`Record`] to remote database properties.
//!
//! Every property kind the remote schema uses is one [`PropertyValue`]
//! variant; [`record_properties`] is the only place record fields are mapped.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use curator_core::{Introducer, Record};

pub const NAME: &str = "Name";
pub const URL: &str = "URL";
pub const TYPE: &str = "Type";
pub const DESCRIPTION: &str = "Description";
pub const TOPICS: &str = "Topics";
pub const STYLE: &str = "Style";
pub const PRICING: &str = "Pricing";
pub const GITHUB: &str = "GitHub";
pub const DOCUMENTATION: &str = "Documentation";
pub const ARTICLE: &str = "Article";
pub const INTRODUCER: &str = "Introducer";
pub const INTRODUCER_GITHUB: &str = "Introducer GitHub";
pub const INTRODUCER_X: &str = "Introducer X";

const GITHUB_PROFILE: &str = "https://github.com/";
const X_PROFILE: &str = "https://x.com/";

/// One typed remote property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Title(String),
    /// `None` clears the property.
    Url(Option<String>),
    Select(String),
    MultiSelect(Vec<String>),
    RichText(String),
}

impl PropertyValue {
    /// Wire representation expected by the remote API.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Title(text) => json!({ "title": [text_run(text)] }),
            PropertyValue::Url(url) => json!({ "url": url }),
            PropertyValue::Select(name) => json!({ "select": { "name": name } }),
            PropertyValue::MultiSelect(names) => json!({
                "multi_select": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>()
            }),
            PropertyValue::RichText(text) => json!({ "rich_text": [text_run(text)] }),
        }
    }
}

fn text_run(text: &str) -> Value {
    json!({ "type": "text", "text": { "content": text } })
}

/// Property name → value, in a stable order.
pub type PropertyMap = BTreeMap<&'static str, PropertyValue>;

/// Serialize a whole property map for a create/update request body.
pub fn properties_json(properties: &PropertyMap) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect(),
    )
}

/// Build the full property set for `record`. Optional fields that are absent
/// are sent as cleared values so an update removes stale data.
pub fn record_properties(record: &Record) -> PropertyMap {
    let links = record.links.clone().unwrap_or_default();
    let introducer = record.introducer.clone().unwrap_or_default();

    let mut props = PropertyMap::new();
    props.insert(NAME, PropertyValue::Title(record.name.0.clone()));
    props.insert(URL, PropertyValue::Url(Some(record.url.clone())));
    props.insert(TYPE, PropertyValue::Select(record.resource_type.as_str().to_string()));
    props.insert(DESCRIPTION, PropertyValue::RichText(record.description.clone()));
    props.insert(TOPICS, PropertyValue::MultiSelect(record.topics.clone()));
    props.insert(STYLE, PropertyValue::Select(record.style.as_str().to_string()));
    props.insert(PRICING, PropertyValue::Select(record.pricing.as_str().to_string()));
    props.insert(GITHUB, PropertyValue::Url(links.github));
    props.insert(DOCUMENTATION, PropertyValue::Url(links.documentation));
    props.insert(ARTICLE, PropertyValue::Url(links.article));
    insert_introducer(&mut props, &introducer);
    props
}

fn insert_introducer(props: &mut PropertyMap, introducer: &Introducer) {
    props.insert(
        INTRODUCER,
        PropertyValue::RichText(introducer.name.clone().unwrap_or_default()),
    );
    props.insert(
        INTRODUCER_GITHUB,
        PropertyValue::Url(introducer.github.as_deref().map(|h| profile_url(GITHUB_PROFILE, h))),
    );
    props.insert(
        INTRODUCER_X,
        PropertyValue::Url(introducer.x.as_deref().map(|h| profile_url(X_PROFILE, h))),
    );
}

/// `@handle` or `handle` → `<prefix>handle`; full URLs pass through.
pub fn profile_url(prefix: &str, handle: &str) -> String {
    let handle = handle.trim();
    if handle.starts_with("https://") || handle.starts_with("http://") {
        return handle.to_string();
    }
    format!("{prefix}{}", handle.trim_start_matches('@'))
}

/// Display name of a remote entry: the first run of its `Name` title property.
pub fn title_of(properties: &Value) -> Option<String> {
    let name = properties.get(NAME)?;
    if name.get("type").and_then(Value::as_str) != Some("title") {
        return None;
    }
    let run = name.get("title")?.as_array()?.first()?;
    run.get("plain_text")
        .or_else(|| run.get("text").and_then(|t| t.get("content")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
