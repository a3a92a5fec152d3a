//! Shared sync pipeline entrypoint used by the CLI.
//!
//! resolve revisions → change set → remote index → corpus → plan → execute
//! → record the synced revision.

use std::path::PathBuf;

use chrono::Utc;

use curator_core::corpus;

use crate::history::{resolve_change_set, ChangeSet, RepositoryHistory};
use crate::reconcile::{self, SyncPlan, SyncReport};
use crate::remote::{fetch_index, RemoteStore};
use crate::state::{self, SyncState};
use crate::SyncError;

/// Revision diffed from when none is given and no sync has been recorded.
pub const DEFAULT_FROM: &str = "HEAD~1";
/// Revision synced up to by default.
pub const DEFAULT_TO: &str = "HEAD";

/// Inputs for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Repository root; also where the sync state is kept.
    pub repo: PathBuf,
    /// Corpus directory, relative to `repo`.
    pub corpus_dir: PathBuf,
    /// Older revision; falls back to the recorded state, then [`DEFAULT_FROM`].
    pub from: Option<String>,
    pub to: String,
    /// Plan only; no remote writes, no state update.
    pub dry_run: bool,
}

/// What a sync run decided and, unless dry-run, what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub from: String,
    pub to: String,
    pub change_set: ChangeSet,
    pub plan: SyncPlan,
    /// `None` for a dry run.
    pub report: Option<SyncReport>,
}

/// Run the sync pipeline.
///
/// Per-record failures end up in the report; errors returned here are the
/// run-level ones (history, index query, missing corpus).
pub async fn run<S, H>(store: &S, history: &H, options: &SyncOptions) -> Result<SyncOutcome, SyncError>
where
    S: RemoteStore + ?Sized,
    H: RepositoryHistory + ?Sized,
{
    let from_spec = match &options.from {
        Some(from) => from.clone(),
        None => match state::load_at(&options.repo).await? {
            Some(recorded) => {
                tracing::info!(revision = %recorded.revision, synced_at = %recorded.synced_at, "continuing from last sync");
                recorded.revision
            }
            None => DEFAULT_FROM.to_string(),
        },
    };
    let from = history.resolve(&from_spec).await?;
    let to = history.resolve(&options.to).await?;

    let dir = options.corpus_dir.to_string_lossy();
    let change_set = resolve_change_set(history, &from, &to, &dir).await?;
    let index = fetch_index(store).await?;
    let files = corpus::read_corpus(&options.repo.join(&options.corpus_dir)).await?;

    let plan = reconcile::plan(&change_set, &index, &files);
    if options.dry_run {
        tracing::info!(operations = plan.operations.len(), "dry run, no remote writes");
        return Ok(SyncOutcome {
            from,
            to,
            change_set,
            plan,
            report: None,
        });
    }

    let report = reconcile::execute(store, &plan).await;
    if report.errors == 0 {
        state::save_at(
            &options.repo,
            &SyncState {
                synced_at: Utc::now(),
                revision: to.clone(),
            },
        )
        .await?;
    } else {
        tracing::warn!(errors = report.errors, "sync had errors, last synced revision left unchanged");
    }

    Ok(SyncOutcome {
        from,
        to,
        change_set,
        plan,
        report: Some(report),
    })
}
