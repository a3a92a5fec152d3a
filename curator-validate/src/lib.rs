//! Record validation for `curator-validate`.
//!
//! [`validate_files`] runs, per file: the file-name convention, JSON parsing,
//! [`schema::validate_schema`], and (for structurally valid records)
//! [`liveness::UrlChecker::check_record`]. Once every file has a result,
//! [`duplicates::find_duplicates`] runs over the records that passed the
//! schema and overrides the result of every file it flags.

pub mod duplicates;
mod error;
pub mod liveness;
pub mod schema;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use curator_core::{
    corpus::{self, is_valid_file_name},
    CorpusFile, Record,
};

pub use duplicates::find_duplicates;
pub use error::ValidateError;
pub use liveness::{
    HttpProbe, LivenessConfig, Probe, ProbeError, ProbeMethod, UrlCheck, UrlChecker,
};
pub use schema::{validate_schema, SchemaError};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Validation outcome for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl FileResult {
    fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            warnings: Vec::new(),
        }
    }
}

/// Aggregate outcome for the whole corpus, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub results: BTreeMap<String, FileResult>,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
}

impl ValidationReport {
    /// `true` iff no file is invalid.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn tally(&mut self) {
        self.passed = self.results.values().filter(|r| r.valid).count();
        self.failed = self.results.len() - self.passed;
        self.warned = self
            .results
            .values()
            .filter(|r| !r.warnings.is_empty())
            .count();
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load every record under `dir` and validate it.
///
/// Only corpus-level problems (missing or empty directory, unreadable file)
/// are returned as errors.
pub async fn validate_dir<P: Probe>(
    dir: &Path,
    checker: &UrlChecker<P>,
) -> Result<ValidationReport, ValidateError> {
    let files = corpus::read_corpus(dir).await?;
    Ok(validate_files(&files, checker).await)
}

/// Validate already-loaded files, one at a time.
pub async fn validate_files<P: Probe>(
    files: &[CorpusFile],
    checker: &UrlChecker<P>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut schema_valid: Vec<(&str, Record)> = Vec::new();

    for file in files {
        let (result, record) = validate_file(file, checker).await;
        if !result.valid {
            tracing::warn!(file = %file.file_name, errors = result.errors.len(), "record failed validation");
        }
        if let Some(record) = record {
            schema_valid.push((file.file_name.as_str(), record));
        }
        report.results.insert(file.file_name.clone(), result);
    }

    let conflicts = find_duplicates(schema_valid.iter().map(|(file, record)| (*file, record)));
    for (file, messages) in conflicts {
        tracing::warn!(file = %file, "duplicate record");
        let result = report.results.entry(file).or_default();
        result.valid = false;
        result.errors = messages;
    }

    report.tally();
    report
}

/// Validate a single file. Also returns the typed record when the file passed
/// the structural checks, so it can take part in duplicate detection.
async fn validate_file<P: Probe>(
    file: &CorpusFile,
    checker: &UrlChecker<P>,
) -> (FileResult, Option<Record>) {
    if !is_valid_file_name(&file.file_name) {
        return (
            FileResult::invalid(vec![format!(
                "file name '{}' must be lowercase words joined by hyphens, ending in .json",
                file.file_name
            )]),
            None,
        );
    }

    let value = match serde_json::from_slice::<serde_json::Value>(&file.contents) {
        Ok(value) => value,
        Err(err) => {
            return (FileResult::invalid(vec![format!("parse error: {err}")]), None);
        }
    };

    let schema_errors = validate_schema(&value);
    if !schema_errors.is_empty() {
        let errors = schema_errors.iter().map(ToString::to_string).collect();
        return (FileResult::invalid(errors), None);
    }

    let record: Record = match serde_json::from_value(value) {
        Ok(record) => record,
        Err(err) => {
            return (FileResult::invalid(vec![format!("parse error: {err}")]), None);
        }
    };

    let check = checker.check_record(&record).await;
    let result = FileResult {
        valid: check.errors.is_empty(),
        errors: check.errors,
        warnings: check.warnings,
    };
    (result, Some(record))
}
