//! # curator-sync
//!
//! Change-set driven synchronization of the record corpus into a hosted
//! database.
//!
//! Call [`pipeline::run`] with a [`RemoteStore`] (normally
//! [`notion::NotionClient`]) and a [`RepositoryHistory`] (normally
//! [`history::GitHistory`]).

pub mod error;
pub mod history;
pub mod notion;
pub mod pipeline;
pub mod properties;
pub mod reconcile;
pub mod remote;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::SyncError;
pub use history::{resolve_change_set, ChangeSet, GitHistory, RepositoryHistory};
pub use notion::{NotionClient, NotionConfig};
pub use pipeline::{SyncOptions, SyncOutcome};
pub use reconcile::{reconcile, SyncOperation, SyncPlan, SyncReport};
pub use remote::{fetch_index, RemoteIndex, RemoteStore};
