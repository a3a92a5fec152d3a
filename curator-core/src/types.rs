//! Domain types for curated learning resources.
//!
//! One [`Record`] lives in one JSON file. Records are plain data: validation
//! and sync read them, nothing mutates them in place.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Display name of a record. Unique across the corpus (case-insensitive) and
/// used as the key when matching remote entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordName(pub String);

impl RecordName {
    /// Case-folded form used for duplicate detection.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RecordName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What kind of resource a record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Learning,
    Reference,
    Tutorial,
    Course,
    Documentation,
}

impl ResourceType {
    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::Learning,
            ResourceType::Reference,
            ResourceType::Tutorial,
            ResourceType::Course,
            ResourceType::Documentation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Learning => "learning",
            ResourceType::Reference => "reference",
            ResourceType::Tutorial => "tutorial",
            ResourceType::Course => "course",
            ResourceType::Documentation => "documentation",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the material is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    Interactive,
    Video,
    Reading,
    ProjectBased,
    Mixed,
}

impl Style {
    pub fn all() -> &'static [Style] {
        &[
            Style::Interactive,
            Style::Video,
            Style::Reading,
            Style::ProjectBased,
            Style::Mixed,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Interactive => "interactive",
            Style::Video => "video",
            Style::Reading => "reading",
            Style::ProjectBased => "project-based",
            Style::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pricing model of the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
    Subscription,
}

impl Pricing {
    pub fn all() -> &'static [Pricing] {
        &[
            Pricing::Free,
            Pricing::Freemium,
            Pricing::Paid,
            Pricing::Subscription,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pricing::Free => "free",
            Pricing::Freemium => "freemium",
            Pricing::Paid => "paid",
            Pricing::Subscription => "subscription",
        }
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Auxiliary links. The three well-known keys are typed; anything else lands
/// in `extra` and is still URL-checked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Links {
    /// All `(key, url)` pairs, well-known keys first.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        if let Some(url) = &self.github {
            out.push(("github", url.as_str()));
        }
        if let Some(url) = &self.documentation {
            out.push(("documentation", url.as_str()));
        }
        if let Some(url) = &self.article {
            out.push(("article", url.as_str()));
        }
        out.extend(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        out
    }
}

/// Who suggested the resource. `github` and `x` hold handles (`@someone`) or
/// full profile URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Introducer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
}

/// A single curated learning resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: RecordName,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub description: String,
    pub topics: Vec<String>,
    pub style: Style,
    pub pricing: Pricing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introducer: Option<Introducer>,
}

impl Record {
    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }
}

/// Lowercase and strip trailing slashes; two URLs that normalize equal are
/// the same resource.
pub fn normalize_url(url: &str) -> String {
    url.to_lowercase().trim_end_matches('/').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display_and_fold() {
        let name = RecordName::from("Learn Rust");
        assert_eq!(name.to_string(), "Learn Rust");
        assert_eq!(name.folded(), "learn rust");
    }

    #[test]
    fn style_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&Style::ProjectBased).expect("serialize");
        assert_eq!(json, "\"project-based\"");
        assert_eq!(Style::ProjectBased.as_str(), "project-based");
    }

    #[test]
    fn enum_as_str_matches_serde() {
        for t in ResourceType::all() {
            let json = serde_json::to_value(t).expect("serialize");
            assert_eq!(json, serde_json::Value::String(t.as_str().to_string()));
        }
        for p in Pricing::all() {
            let json = serde_json::to_value(p).expect("serialize");
            assert_eq!(json, serde_json::Value::String(p.as_str().to_string()));
        }
    }

    #[test]
    fn normalize_url_strips_case_and_trailing_slash() {
        assert_eq!(normalize_url("https://Example.com/Path/"), "https://example.com/path");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn links_entries_keep_extra_keys() {
        let json = r#"{"github":"https://github.com/a","playground":"https://play.example.com"}"#;
        let links: Links = serde_json::from_str(json).expect("parse");
        assert_eq!(
            links.entries(),
            vec![
                ("github", "https://github.com/a"),
                ("playground", "https://play.example.com"),
            ]
        );
    }
}
