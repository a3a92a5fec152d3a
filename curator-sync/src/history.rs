//! Change-set resolution from version-control history.
//!
//! A [`RepositoryHistory`] answers two questions about the corpus directory:
//! which record files changed between two revisions, and what a file held at
//! a given revision. [`resolve_change_set`] turns those answers into record
//! *names*, reading added/modified files at the newer revision and deleted
//! files at the older one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use curator_core::{corpus::RECORD_EXTENSION, RecordName};

use crate::error::{io_err, SyncError};

/// Status of one changed path between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
}

/// One changed path, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    pub status: ChangeStatus,
    pub path: String,
}

/// Read-only access to repository history.
#[async_trait]
pub trait RepositoryHistory: Send + Sync {
    /// Paths under `dir` that differ between `from` and `to`.
    async fn changed_paths(
        &self,
        from: &str,
        to: &str,
        dir: &str,
    ) -> Result<Vec<PathChange>, SyncError>;

    /// Contents of `path` as of `revision`.
    async fn read_at(&self, revision: &str, path: &str) -> Result<String, SyncError>;

    /// Pin a revision expression to a stable identifier.
    async fn resolve(&self, revision: &str) -> Result<String, SyncError> {
        Ok(revision.to_string())
    }
}

/// Record names added, modified, and deleted between two revisions.
/// The three lists are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub added: Vec<RecordName>,
    pub modified: Vec<RecordName>,
    pub deleted: Vec<RecordName>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// De-duplicate each list and make the lists disjoint. A name both added
    /// and deleted (a record moved to another file) becomes modified.
    pub fn normalized(self) -> Self {
        let added_set: HashSet<&RecordName> = self.added.iter().collect();
        let deleted_set: HashSet<&RecordName> = self.deleted.iter().collect();

        let added = unique(self.added.iter().filter(|n| !deleted_set.contains(n)));
        let deleted = unique(self.deleted.iter().filter(|n| !added_set.contains(n)));
        let moved = self.added.iter().filter(|n| deleted_set.contains(n));
        let modified = unique(
            self.modified
                .iter()
                .chain(moved)
                .filter(|n| !added.contains(*n) && !deleted.contains(*n)),
        );

        Self {
            added,
            modified,
            deleted,
        }
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a RecordName>) -> Vec<RecordName> {
    let mut seen = HashSet::new();
    names
        .filter(|n| seen.insert(*n))
        .cloned()
        .collect()
}

#[derive(Deserialize)]
struct NameOnly {
    name: RecordName,
}

/// Build the [`ChangeSet`] for record files under `dir` between `from` and `to`.
///
/// A path whose content cannot be read or parsed is logged and skipped; only
/// a failure to list the changes at all is returned as an error.
pub async fn resolve_change_set<H: RepositoryHistory + ?Sized>(
    history: &H,
    from: &str,
    to: &str,
    dir: &str,
) -> Result<ChangeSet, SyncError> {
    let scope = dir.trim_start_matches("./").trim_end_matches('/');
    let changes = history.changed_paths(from, to, scope).await?;

    let mut set = ChangeSet::default();
    for change in changes {
        if !in_scope(&change.path, scope) {
            tracing::debug!(path = %change.path, "ignoring change outside the corpus");
            continue;
        }
        let revision = match change.status {
            ChangeStatus::Added | ChangeStatus::Modified => to,
            ChangeStatus::Deleted => from,
        };
        let name = match read_name(history, revision, &change.path).await {
            Ok(name) => name,
            Err(err) => {
                tracing::warn!(path = %change.path, revision, error = %err, "skipping unreadable record");
                continue;
            }
        };
        match change.status {
            ChangeStatus::Added => set.added.push(name),
            ChangeStatus::Modified => set.modified.push(name),
            ChangeStatus::Deleted => set.deleted.push(name),
        }
    }

    let set = set.normalized();
    tracing::info!(
        from,
        to,
        added = set.added.len(),
        modified = set.modified.len(),
        deleted = set.deleted.len(),
        "resolved change set"
    );
    Ok(set)
}

async fn read_name<H: RepositoryHistory + ?Sized>(
    history: &H,
    revision: &str,
    path: &str,
) -> Result<RecordName, SyncError> {
    let contents = history.read_at(revision, path).await?;
    let parsed: NameOnly = serde_json::from_str(&contents)?;
    Ok(parsed.name)
}

fn in_scope(path: &str, scope: &str) -> bool {
    let path = Path::new(path);
    let has_extension = path
        .extension()
        .map(|ext| ext == RECORD_EXTENSION)
        .unwrap_or(false);
    has_extension && (scope.is_empty() || path.starts_with(scope))
}

// ---------------------------------------------------------------------------
// git
// ---------------------------------------------------------------------------

/// [`RepositoryHistory`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo: PathBuf,
}

impl GitHistory {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    async fn git(&self, args: &[&str]) -> Result<String, SyncError> {
        let output = tokio::process::Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()
            .await
            .map_err(|e| io_err(&self.repo, e))?;
        if !output.status.success() {
            return Err(SyncError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl RepositoryHistory for GitHistory {
    async fn changed_paths(
        &self,
        from: &str,
        to: &str,
        dir: &str,
    ) -> Result<Vec<PathChange>, SyncError> {
        let mut args = vec!["diff", "--name-status", "--no-renames", from, to];
        if !dir.is_empty() {
            args.extend(["--", dir]);
        }
        let out = self.git(&args).await?;
        Ok(parse_name_status(&out))
    }

    async fn read_at(&self, revision: &str, path: &str) -> Result<String, SyncError> {
        self.git(&["show", &format!("{revision}:{path}")]).await
    }

    /// `HEAD`, `HEAD~1`, a branch or tag → full commit id.
    async fn resolve(&self, revision: &str) -> Result<String, SyncError> {
        let spec = format!("{revision}^{{commit}}");
        let out = self.git(&["rev-parse", "--verify", &spec]).await?;
        Ok(out.trim().to_string())
    }
}

/// Parse `git diff --name-status` output. Unknown status letters are skipped.
pub fn parse_name_status(output: &str) -> Vec<PathChange> {
    output
        .lines()
        .filter_map(|line| {
            let (status, path) = line.split_once('\t')?;
            let status = match status.chars().next()? {
                'A' => ChangeStatus::Added,
                'M' | 'T' => ChangeStatus::Modified,
                'D' => ChangeStatus::Deleted,
                _ => {
                    tracing::debug!(line, "unrecognized diff status");
                    return None;
                }
            };
            Some(PathChange {
                status,
                path: path.to_string(),
            })
        })
        .collect()
}
