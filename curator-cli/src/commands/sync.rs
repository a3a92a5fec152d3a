//! `curator sync` — push changed records to the Notion database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use curator_core::corpus::DEFAULT_CORPUS_DIR;
use curator_sync::{
    pipeline::{self, DEFAULT_TO},
    GitHistory, NotionClient, NotionConfig, SyncOperation, SyncOptions, SyncOutcome,
};

/// Arguments for `curator sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Notion integration token.
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Id of the target Notion database.
    #[arg(long, env = "NOTION_DATABASE_ID")]
    pub database_id: Option<String>,

    /// Repository root.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Record directory, relative to the repository root.
    #[arg(long, default_value = DEFAULT_CORPUS_DIR)]
    pub dir: PathBuf,

    /// Older revision. Defaults to the last synced revision, or HEAD~1.
    #[arg(long, value_name = "REV")]
    pub from: Option<String>,

    /// Newer revision.
    #[arg(long, value_name = "REV", default_value = DEFAULT_TO)]
    pub to: String,

    /// Show what would be written without touching the database.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub async fn run(self) -> Result<()> {
        let config = NotionConfig {
            token: non_empty(self.token).context("NOTION_TOKEN is not set")?,
            database_id: non_empty(self.database_id).context("NOTION_DATABASE_ID is not set")?,
        };
        let client = NotionClient::new(config).context("failed to build Notion client")?;
        let history = GitHistory::new(&self.repo);

        let options = SyncOptions {
            repo: self.repo,
            corpus_dir: self.dir,
            from: self.from,
            to: self.to,
            dry_run: self.dry_run,
        };
        let outcome = pipeline::run(&client, &history, &options)
            .await
            .context("sync failed")?;

        print_outcome(&outcome, options.dry_run);
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn print_outcome(outcome: &SyncOutcome, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let set = &outcome.change_set;
    println!(
        "{prefix}{}..{}: {} added, {} modified, {} deleted",
        short(&outcome.from),
        short(&outcome.to),
        set.added.len(),
        set.modified.len(),
        set.deleted.len()
    );

    if outcome.plan.is_noop()
        && outcome.plan.load_errors.is_empty()
        && outcome.plan.unmatched_modified.is_empty()
    {
        println!("{prefix}✓ nothing to do");
        return;
    }

    for op in &outcome.plan.operations {
        match op {
            SyncOperation::Create { file, record } => {
                println!("  {}  {} ({file})", "+".green(), record.name)
            }
            SyncOperation::Update { file, record, .. } => {
                println!("  {}  {} ({file})", "~".yellow(), record.name)
            }
            SyncOperation::Archive { name, .. } => println!("  {}  {name}", "-".red()),
        }
    }
    for name in &outcome.plan.missing_remote {
        println!("  {}  {name} (deleted, not in database)", "·".bright_black());
    }
    for name in &outcome.plan.unmatched_modified {
        println!(
            "  {}  {name} (modified, not in database; renamed?)",
            "?".yellow()
        );
    }
    for (file, message) in &outcome.plan.load_errors {
        println!("  {}  {file}: {message}", "✗".red());
    }

    if let Some(report) = &outcome.report {
        if report.errors == 0 {
            println!("{} {report}", "✓".green().bold());
        } else {
            println!("{} {report}", "✗".red().bold());
        }
    }
}

fn short(revision: &str) -> &str {
    revision.get(..7).unwrap_or(revision)
}
