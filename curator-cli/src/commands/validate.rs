//! `curator validate` — check the whole corpus before it is merged.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{builder::BoolishValueParser, Args};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use curator_core::corpus::DEFAULT_CORPUS_DIR;
use curator_validate::{validate_dir, FileResult, LivenessConfig, UrlChecker, ValidationReport};

/// Arguments for `curator validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory holding the record files.
    #[arg(long, default_value = DEFAULT_CORPUS_DIR)]
    pub dir: PathBuf,

    /// Skip network liveness checks (accepts 1/true/yes from the environment).
    #[arg(long, env = "SKIP_URL_CHECK", value_parser = BoolishValueParser::new())]
    pub skip_url_check: bool,

    /// Per-request timeout for liveness checks.
    #[arg(long, default_value_t = 10, value_name = "SECONDS")]
    pub timeout_secs: u64,

    /// Emit the machine-readable report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "details")]
    details: String,
}

impl ValidateArgs {
    pub async fn run(self) -> Result<()> {
        let config = LivenessConfig {
            enabled: !self.skip_url_check,
            timeout: Duration::from_secs(self.timeout_secs),
        };
        if !config.enabled {
            tracing::info!("URL liveness checks disabled");
        }
        let checker = UrlChecker::http(config).context("failed to build HTTP client")?;

        let report = validate_dir(&self.dir, &checker)
            .await
            .with_context(|| format!("cannot validate '{}'", self.dir.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report JSON")?
            );
        } else {
            print_report(&report);
        }

        if !report.is_success() {
            bail!(
                "{} of {} record files are invalid",
                report.failed,
                report.results.len()
            );
        }
        Ok(())
    }
}

fn print_report(report: &ValidationReport) {
    let rows: Vec<ResultRow> = report
        .results
        .iter()
        .filter(|(_, result)| !result.valid || !result.warnings.is_empty())
        .map(|(file, result)| ResultRow {
            file: file.clone(),
            status: status_label(result),
            details: details(result),
        })
        .collect();

    if !rows.is_empty() {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    let summary = format!(
        "{} passed, {} failed, {} with warnings",
        report.passed, report.failed, report.warned
    );
    if report.is_success() {
        println!("{} {summary}", "✓".green().bold());
    } else {
        println!("{} {summary}", "✗".red().bold());
    }
}

fn status_label(result: &FileResult) -> String {
    if !result.valid {
        "INVALID".red().bold().to_string()
    } else {
        "WARN".yellow().bold().to_string()
    }
}

fn details(result: &FileResult) -> String {
    result
        .errors
        .iter()
        .map(|e| format!("error: {e}"))
        .chain(result.warnings.iter().map(|w| format!("warning: {w}")))
        .collect::<Vec<_>>()
        .join("\n")
}
