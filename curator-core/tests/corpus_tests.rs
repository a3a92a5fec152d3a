//! Corpus loading and scaffold integration tests.
//!
//! Every test gets its own temp directory.

use assert_fs::prelude::*;
use curator_core::{
    corpus::{self, is_valid_file_name},
    CorpusError, Pricing, ResourceType, Style,
};
use predicates::prelude::predicate;

const VALID: &str = r#"{
  "name": "The Rust Book",
  "url": "https://doc.rust-lang.org/book/",
  "type": "documentation",
  "description": "The official book.",
  "topics": ["rust"],
  "style": "reading",
  "pricing": "free",
  "links": { "github": "https://github.com/rust-lang/book" },
  "introducer": { "name": "Ferris", "github": "@ferris" }
}"#;

// ---------------------------------------------------------------------------
// 1. Enumeration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_dir_returns_not_found() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let err = corpus::read_corpus(&root.path().join("sites")).await.unwrap_err();
    assert!(matches!(err, CorpusError::CorpusNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("sites"));
}

#[tokio::test]
async fn empty_dir_is_an_error() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("sites").create_dir_all().expect("mkdir");
    root.child("sites/README.md").write_str("not a record").expect("write");

    let err = corpus::read_corpus(&root.path().join("sites")).await.unwrap_err();
    assert!(matches!(err, CorpusError::EmptyCorpus { .. }), "got: {err}");
}

#[tokio::test]
async fn read_corpus_is_sorted_and_skips_other_extensions() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("sites/zeta.json").write_str(VALID).expect("write");
    root.child("sites/alpha.json").write_str("{ broken").expect("write");
    root.child("sites/notes.txt").write_str("ignored").expect("write");
    root.child("sites/nested/inner.json").write_str(VALID).expect("write");

    let files = corpus::read_corpus(&root.path().join("sites")).await.expect("read");
    let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["alpha.json", "zeta.json"]);

    // Malformed JSON is returned as-is and only fails on parse.
    let err = files[0].json().unwrap_err();
    assert!(matches!(err, CorpusError::Parse { .. }));
    assert!(err.to_string().contains("alpha.json"));
}

#[tokio::test]
async fn non_utf8_file_loads_and_fails_on_parse() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("sites/good.json").write_str(VALID).expect("write");
    root.child("sites/bad.json")
        .write_binary(&[0xff, 0xfe, b'{'])
        .expect("write");

    let files = corpus::read_corpus(&root.path().join("sites")).await.expect("read");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name, "bad.json");
    assert!(matches!(files[0].record(), Err(CorpusError::Parse { .. })));
    assert!(files[1].record().is_ok());
}

#[tokio::test]
async fn record_parses_typed_fields() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("sites/rust-book.json").write_str(VALID).expect("write");

    let files = corpus::read_corpus(&root.path().join("sites")).await.expect("read");
    let record = files[0].record().expect("record");
    assert_eq!(record.name.0, "The Rust Book");
    assert_eq!(record.resource_type, ResourceType::Documentation);
    assert_eq!(record.style, Style::Reading);
    assert_eq!(record.pricing, Pricing::Free);
    assert_eq!(record.normalized_url(), "https://doc.rust-lang.org/book");
    let introducer = record.introducer.expect("introducer");
    assert_eq!(introducer.github.as_deref(), Some("@ferris"));
}

// ---------------------------------------------------------------------------
// 2. Scaffold
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scaffold_writes_template_under_slug() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let dir = root.path().join("sites");

    let path = corpus::scaffold_at(&dir, "Learn You A Haskell!").await.expect("scaffold");
    assert!(path.ends_with("learn-you-a-haskell.json"));
    root.child("sites/learn-you-a-haskell.json")
        .assert(predicate::str::contains("\"name\": \"Learn You A Haskell!\""));

    let file_name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(is_valid_file_name(file_name));

    let files = corpus::read_corpus(&dir).await.expect("read");
    files[0].record().expect("template parses as a record");
}

#[tokio::test]
async fn scaffold_refuses_to_overwrite() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("sites/rust-book.json").write_str(VALID).expect("write");

    let err = corpus::scaffold_at(&root.path().join("sites"), "Rust Book")
        .await
        .unwrap_err();
    assert!(matches!(err, CorpusError::AlreadyExists { .. }), "got: {err}");
    root.child("sites/rust-book.json")
        .assert(predicate::str::contains("The Rust Book"));
}

#[tokio::test]
async fn scaffold_rejects_names_without_letters_or_digits() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let err = corpus::scaffold_at(&root.path().join("sites"), "?!").await.unwrap_err();
    assert!(matches!(err, CorpusError::InvalidName { .. }), "got: {err}");
}
