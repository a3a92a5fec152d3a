//! Record corpus on disk.
//!
//! # Storage layout
//!
//! ```text
//! <repo>/
//!   sites/
//!     <record-slug>.json   (one record per file)
//! ```
//!
//! File identity is the file name; a record's logical identity is its
//! `name` / `url`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{io_err, CorpusError};
use crate::types::{Pricing, Record, RecordName, ResourceType, Style};

/// Directory (relative to the repository root) holding the record files.
pub const DEFAULT_CORPUS_DIR: &str = "sites";

/// Extension of record files.
pub const RECORD_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// 1. File-name convention
// ---------------------------------------------------------------------------

static FILE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*\.json$").expect("file name pattern compiles")
});

/// `true` when `file_name` is a lowercase-hyphen identifier with a `.json` suffix.
pub fn is_valid_file_name(file_name: &str) -> bool {
    FILE_NAME_PATTERN.is_match(file_name)
}

/// Turn free text into the file-name stem convention: lowercase, runs of
/// anything but ASCII letters/digits collapse to one `-`, no leading or
/// trailing `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// One record file as read from disk, not yet parsed or even decoded.
///
/// Bytes are kept raw so a file that is not UTF-8 surfaces as a parse error
/// for that one file instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub file_name: String,
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl CorpusFile {
    /// Parse as untyped JSON.
    pub fn json(&self) -> Result<Value, CorpusError> {
        serde_json::from_slice(&self.contents).map_err(|e| CorpusError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Parse as a typed [`Record`].
    pub fn record(&self) -> Result<Record, CorpusError> {
        serde_json::from_slice(&self.contents).map_err(|e| CorpusError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// List every `*.json` file directly under `dir`, sorted by file name.
///
/// Returns `CorpusError::CorpusNotFound` if `dir` is missing.
pub async fn list_record_files(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !tokio::fs::try_exists(dir).await.map_err(|e| io_err(dir, e))? {
        return Err(CorpusError::CorpusNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| io_err(dir, e))?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| io_err(dir, e))? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        let is_record = path
            .extension()
            .map(|ext| ext == RECORD_EXTENSION)
            .unwrap_or(false);
        if is_file && is_record {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read every record file under `dir`.
///
/// Returns `CorpusError::EmptyCorpus` when there is nothing to read; decode
/// and parse failures are left to the caller (see [`CorpusFile::json`]).
pub async fn read_corpus(dir: &Path) -> Result<Vec<CorpusFile>, CorpusError> {
    let paths = list_record_files(dir).await?;
    if paths.is_empty() {
        return Err(CorpusError::EmptyCorpus {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|e| io_err(&path, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(CorpusFile {
            file_name,
            path,
            contents,
        });
    }
    tracing::debug!(dir = %dir.display(), count = files.len(), "loaded corpus");
    Ok(files)
}

// ---------------------------------------------------------------------------
// 3. Scaffold
// ---------------------------------------------------------------------------

/// Starter record for a new entry; every field is a placeholder to edit.
pub fn template_record(name: &str) -> Record {
    Record {
        name: RecordName::from(name),
        url: "https://example.com".to_string(),
        resource_type: ResourceType::Learning,
        description: "One or two sentences about what this resource teaches.".to_string(),
        topics: vec!["topic".to_string()],
        style: Style::Mixed,
        pricing: Pricing::Free,
        links: None,
        introducer: None,
    }
}

/// Write a template record for `name` into `dir` as `<slug>.json`.
///
/// Never overwrites: returns `CorpusError::AlreadyExists` if the file is
/// present. Creates `dir` if needed.
pub async fn scaffold_at(dir: &Path, name: &str) -> Result<PathBuf, CorpusError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CorpusError::InvalidName {
            name: name.to_string(),
        });
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| io_err(dir, e))?;
    let path = dir.join(format!("{slug}.{RECORD_EXTENSION}"));

    let mut json = serde_json::to_string_pretty(&template_record(name.trim()))?;
    json.push('\n');

    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(CorpusError::AlreadyExists { path });
        }
        Err(err) => return Err(io_err(&path, err)),
    };
    file.write_all(json.as_bytes())
        .await
        .map_err(|e| io_err(&path, e))?;
    file.flush().await.map_err(|e| io_err(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Learn Rust -- The Hard Way!"), "learn-rust-the-hard-way");
        assert_eq!(slugify("  MDN Web Docs "), "mdn-web-docs");
        assert_eq!(slugify("C++ & Go"), "c-go");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugified_names_pass_file_name_check() {
        let slug = slugify("The Rust Book (2nd ed.)");
        assert!(is_valid_file_name(&format!("{slug}.json")));
    }

    #[test]
    fn file_name_pattern_compiles() {
        let pattern = LazyLock::force(&FILE_NAME_PATTERN);
        assert_eq!(pattern.as_str(), r"^[a-z0-9]+(-[a-z0-9]+)*\.json$");
    }

    #[rstest]
    #[case("rust-book.json", true)]
    #[case("a1.json", true)]
    #[case("Rust-Book.json", false)]
    #[case("rust_book.json", false)]
    #[case("rust--book.json", false)]
    #[case("-rust.json", false)]
    #[case("rust-book.yaml", false)]
    fn file_name_convention(#[case] file_name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_file_name(file_name), expected, "{file_name}");
    }
}
