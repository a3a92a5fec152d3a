//! Last-synced revision, so the next run can diff from where the previous
//! successful run stopped.
//!
//! Persists a [`SyncState`] JSON document at `<repo>/.curator/sync-state.json`.
//! Writes go to a `.tmp` sibling and are renamed into place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, SyncError};

/// On-disk sync state payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncState {
    pub synced_at: DateTime<Utc>,
    /// Commit id the remote store was last brought up to.
    pub revision: String,
}

/// `<repo>/.curator/sync-state.json`
pub fn state_path_at(repo: &Path) -> PathBuf {
    repo.join(".curator").join("sync-state.json")
}

/// Load the state for `repo`; `None` if no sync has been recorded yet.
pub async fn load_at(repo: &Path) -> Result<Option<SyncState>, SyncError> {
    let path = state_path_at(repo);
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(&path, err)),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Save the state for `repo` atomically.
pub async fn save_at(repo: &Path, state: &SyncState) -> Result<(), SyncError> {
    let path = state_path_at(repo);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid sync state path")));
    };
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| io_err(&tmp, e))?;
    tokio::fs::rename(&tmp, &path)
        .await
        .map_err(|e| io_err(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn none_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_at(tmp.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let state = SyncState {
            synced_at: Utc::now(),
            revision: "0123abcd".to_string(),
        };
        save_at(tmp.path(), &state).await.unwrap();
        assert_eq!(load_at(tmp.path()).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let state = SyncState {
            synced_at: Utc::now(),
            revision: "feed".to_string(),
        };
        save_at(tmp.path(), &state).await.unwrap();
        let tmp_path = state_path_at(tmp.path()).with_extension("json.tmp");
        assert!(!tmp_path.exists(), "tmp file should be removed after atomic rename");
    }

    #[tokio::test]
    async fn corrupt_state_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = state_path_at(tmp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_at(tmp.path()).await, Err(SyncError::Json(_))));
    }
}
