//! Corpus-level validation tests for `curator-validate`.
//!
//! Each test writes its own corpus into an isolated `TempDir`; no network.

use std::fs;

use async_trait::async_trait;
use curator_validate::{
    validate_dir, LivenessConfig, Probe, ProbeError, ProbeMethod, UrlChecker, ValidateError,
};
use rstest::rstest;
use tempfile::TempDir;
use url::Url;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every URL on `dead.example` is down; everything else answers 200.
struct FakeWeb;

#[async_trait]
impl Probe for FakeWeb {
    async fn probe(&self, _method: ProbeMethod, url: &Url) -> Result<u16, ProbeError> {
        if url.host_str() == Some("dead.example") {
            Ok(404)
        } else {
            Ok(200)
        }
    }
}

fn offline() -> UrlChecker<FakeWeb> {
    UrlChecker::with_probe(
        FakeWeb,
        LivenessConfig {
            enabled: false,
            ..LivenessConfig::default()
        },
    )
}

fn online() -> UrlChecker<FakeWeb> {
    UrlChecker::with_probe(FakeWeb, LivenessConfig::default())
}

fn record(name: &str, url: &str) -> String {
    format!(
        r#"{{
  "name": "{name}",
  "url": "{url}",
  "type": "learning",
  "description": "A resource.",
  "topics": ["rust"],
  "style": "mixed",
  "pricing": "free"
}}"#
    )
}

fn corpus(files: &[(&str, String)]) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("write fixture");
    }
    dir
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_valid_corpus_succeeds() {
    let dir = corpus(&[
        ("rust-book.json", record("The Rust Book", "https://doc.rust-lang.org/book/")),
        ("rustlings.json", record("Rustlings", "https://rustlings.cool")),
    ]);
    let report = validate_dir(dir.path(), &offline()).await.expect("validate");
    assert!(report.is_success());
    assert_eq!((report.passed, report.failed, report.warned), (2, 0, 0));
}

#[tokio::test]
async fn duplicate_pair_and_schema_failure_all_fail() {
    let missing_pricing = record("Gamma", "https://c.example").replace(",\n  \"pricing\": \"free\"", "");
    let dir = corpus(&[
        ("a.json", record("Alpha", "https://a.example")),
        ("b.json", record("alpha", "https://b.example")),
        ("c.json", missing_pricing),
    ]);

    let report = validate_dir(dir.path(), &offline()).await.expect("validate");
    assert!(!report.is_success());
    assert_eq!(report.passed, 0);
    assert_eq!(report.failed, 3);

    let a = &report.results["a.json"];
    assert!(!a.valid);
    assert_eq!(a.errors, vec!["duplicate name \"alpha\" also used by b.json"]);
    let b = &report.results["b.json"];
    assert_eq!(b.errors, vec!["duplicate name \"alpha\" also used by a.json"]);
    let c = &report.results["c.json"];
    assert_eq!(c.errors, vec!["pricing: missing required property"]);
}

#[tokio::test]
async fn schema_invalid_records_do_not_take_part_in_duplicates() {
    let mut broken: serde_json::Value =
        serde_json::from_str(&record("Alpha", "https://a.example")).expect("json");
    broken["style"] = serde_json::json!("audio");
    let dir = corpus(&[
        ("a.json", record("Alpha", "https://a.example")),
        ("b.json", broken.to_string()),
    ]);

    let report = validate_dir(dir.path(), &offline()).await.expect("validate");
    assert!(report.results["a.json"].valid);
    assert!(report.results["b.json"].errors[0].starts_with("style:"));
}

#[tokio::test]
async fn duplicates_override_liveness_errors() {
    let dir = corpus(&[
        ("a.json", record("Same", "https://dead.example/")),
        ("b.json", record("Other", "https://dead.example")),
    ]);
    let report = validate_dir(dir.path(), &online()).await.expect("validate");
    for file in ["a.json", "b.json"] {
        let result = &report.results[file];
        assert_eq!(result.errors.len(), 1, "{file}: {result:?}");
        assert!(result.errors[0].starts_with("duplicate url"));
    }
}

#[tokio::test]
async fn dead_links_fail_only_their_record() {
    let mut with_links: serde_json::Value =
        serde_json::from_str(&record("Linked", "http://live.example")).expect("json");
    with_links["links"] = serde_json::json!({
        "github": "https://dead.example/repo",
        "documentation": "https://live.example/docs"
    });
    let dir = corpus(&[
        ("linked.json", with_links.to_string()),
        ("plain.json", record("Plain", "https://live.example/plain")),
    ]);

    let report = validate_dir(dir.path(), &online()).await.expect("validate");
    let linked = &report.results["linked.json"];
    assert!(!linked.valid);
    assert_eq!(linked.errors.len(), 1);
    assert!(linked.errors[0].starts_with("links.github: "));
    assert_eq!(linked.warnings.len(), 1, "plain http main url warns");
    assert!(report.results["plain.json"].valid);
    assert_eq!((report.passed, report.failed, report.warned), (1, 1, 1));
}

#[rstest]
#[case("Bad_Name.json")]
#[case("under_score.json")]
#[case("trailing-.json")]
#[tokio::test]
async fn file_name_violations_short_circuit(#[case] file_name: &str) {
    let dir = corpus(&[(file_name, "{ not even json".to_string())]);
    let report = validate_dir(dir.path(), &offline()).await.expect("validate");
    let result = &report.results[file_name];
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("must be lowercase words joined by hyphens"));
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let dir = corpus(&[("broken.json", "{ \"name\": ".to_string())]);
    let report = validate_dir(dir.path(), &offline()).await.expect("validate");
    let result = &report.results["broken.json"];
    assert!(!result.valid);
    assert!(result.errors[0].starts_with("parse error:"));
}

#[tokio::test]
async fn non_utf8_file_fails_alone() {
    let dir = corpus(&[("good.json", record("Good", "https://good.example"))]);
    fs::write(dir.path().join("bad.json"), [0xff, 0xfe, b'{']).expect("write fixture");

    let report = validate_dir(dir.path(), &offline()).await.expect("validate");
    assert!(report.results["good.json"].valid);
    let bad = &report.results["bad.json"];
    assert!(!bad.valid);
    assert!(bad.errors[0].starts_with("parse error:"), "got: {:?}", bad.errors);
    assert_eq!((report.passed, report.failed), (1, 1));
}

#[tokio::test]
async fn empty_corpus_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let err = validate_dir(dir.path(), &offline()).await.unwrap_err();
    assert!(matches!(err, ValidateError::Corpus(_)), "got: {err}");
}
