//! Sync reconciliation: change set + remote index + corpus → remote writes.
//!
//! Ordering:
//! 1. Deleted names are archived first, looked up by name in the index.
//!    A deleted name with no remote entry is a warning, not an error.
//! 2. Every loadable record on disk: `added` → create, or update when a
//!    remote entry with that name already exists (an earlier run that was not
//!    recorded as complete); `modified` with a remote entry → update;
//!    anything else → unchanged.
//! 3. A failing record is logged and counted; the run always continues.
//!
//! [`plan`] is pure, so an unchanged change set and corpus always plan the
//! same operations, and an empty change set plans none.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use curator_core::{CorpusFile, Record, RecordName};

use crate::history::ChangeSet;
use crate::properties::record_properties;
use crate::remote::{RemoteIndex, RemoteStore};

/// One remote write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOperation {
    Archive { name: RecordName, id: String },
    Create { file: String, record: Record },
    Update { file: String, id: String, record: Record },
}

impl SyncOperation {
    /// Name of the record the operation is about.
    pub fn name(&self) -> &RecordName {
        match self {
            SyncOperation::Archive { name, .. } => name,
            SyncOperation::Create { record, .. } | SyncOperation::Update { record, .. } => {
                &record.name
            }
        }
    }

    /// Label used in logs: the file name, or the record name for archives.
    fn label(&self) -> String {
        match self {
            SyncOperation::Archive { name, .. } => name.0.clone(),
            SyncOperation::Create { file, .. } | SyncOperation::Update { file, .. } => {
                file.clone()
            }
        }
    }
}

/// Everything a sync run would do, computed without touching the remote store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub operations: Vec<SyncOperation>,
    /// Deleted names that have no remote counterpart.
    pub missing_remote: Vec<RecordName>,
    /// Modified names with no remote counterpart, usually a renamed record.
    pub unmatched_modified: Vec<RecordName>,
    /// `(file name, message)` for record files that could not be loaded.
    pub load_errors: Vec<(String, String)>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Aggregate counts for one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub errors: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted, {} errors",
            self.created, self.updated, self.deleted, self.errors
        )
    }
}

/// Compute the operations for `change_set` against `index` and the current corpus.
pub fn plan(change_set: &ChangeSet, index: &RemoteIndex, files: &[CorpusFile]) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for name in &change_set.deleted {
        match index.get(name) {
            Some(id) => plan.operations.push(SyncOperation::Archive {
                name: name.clone(),
                id: id.clone(),
            }),
            None => {
                tracing::warn!(name = %name, "deleted record has no remote entry, nothing to archive");
                plan.missing_remote.push(name.clone());
            }
        }
    }

    let added: HashSet<&RecordName> = change_set.added.iter().collect();
    let modified: HashSet<&RecordName> = change_set.modified.iter().collect();

    for file in files {
        let record = match file.record() {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(file = %file.file_name, error = %err, "cannot load record");
                plan.load_errors.push((file.file_name.clone(), err.to_string()));
                continue;
            }
        };

        if added.contains(&record.name) {
            match index.get(&record.name) {
                Some(id) => {
                    tracing::debug!(file = %file.file_name, name = %record.name, "added record already has a remote entry, updating it");
                    plan.operations.push(SyncOperation::Update {
                        file: file.file_name.clone(),
                        id: id.clone(),
                        record,
                    });
                }
                None => plan.operations.push(SyncOperation::Create {
                    file: file.file_name.clone(),
                    record,
                }),
            }
        } else if modified.contains(&record.name) {
            match index.get(&record.name) {
                Some(id) => plan.operations.push(SyncOperation::Update {
                    file: file.file_name.clone(),
                    id: id.clone(),
                    record,
                }),
                None => {
                    tracing::warn!(
                        file = %file.file_name,
                        name = %record.name,
                        "modified record has no remote entry; if its name was changed, archive the old page and re-add the record"
                    );
                    plan.unmatched_modified.push(record.name);
                }
            }
        }
    }

    plan
}

/// Run every operation in `plan` in order, counting outcomes.
pub async fn execute<S: RemoteStore + ?Sized>(store: &S, plan: &SyncPlan) -> SyncReport {
    let mut report = SyncReport {
        errors: plan.load_errors.len(),
        ..SyncReport::default()
    };

    for op in &plan.operations {
        let result = match op {
            SyncOperation::Archive { id, .. } => store.archive(id).await,
            SyncOperation::Create { record, .. } => {
                store.create(&record_properties(record)).await.map(|_| ())
            }
            SyncOperation::Update { id, record, .. } => {
                store.update(id, &record_properties(record)).await
            }
        };

        match (result, op) {
            (Ok(()), SyncOperation::Archive { .. }) => report.deleted += 1,
            (Ok(()), SyncOperation::Create { .. }) => report.created += 1,
            (Ok(()), SyncOperation::Update { .. }) => report.updated += 1,
            (Err(err), _) => {
                tracing::warn!(file = %op.label(), name = %op.name(), error = %err, "sync operation failed");
                report.errors += 1;
            }
        }
    }

    tracing::info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        errors = report.errors,
        "sync finished"
    );
    report
}

/// [`plan`] then [`execute`].
pub async fn reconcile<S: RemoteStore + ?Sized>(
    store: &S,
    change_set: &ChangeSet,
    index: &RemoteIndex,
    files: &[CorpusFile],
) -> SyncReport {
    execute(store, &plan(change_set, index, files)).await
}
