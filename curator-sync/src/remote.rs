//! Remote store boundary and the name → page-id index built from it.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use curator_core::RecordName;

use crate::properties::{title_of, PropertyMap};
use crate::SyncError;

/// One remote entry as returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub id: String,
    pub properties: Value,
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePage {
    pub entries: Vec<RemoteEntry>,
    /// Cursor for the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// Operations consumed from the hosted database.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// One page of entries, starting at `cursor` (first page when `None`).
    async fn query(&self, cursor: Option<&str>) -> Result<RemotePage, SyncError>;

    /// Create an entry and return its id.
    async fn create(&self, properties: &PropertyMap) -> Result<String, SyncError>;

    /// Replace the properties of an existing entry.
    async fn update(&self, id: &str, properties: &PropertyMap) -> Result<(), SyncError>;

    /// Archive (soft-delete) an entry.
    async fn archive(&self, id: &str) -> Result<(), SyncError>;
}

/// Record name → remote entry id.
pub type RemoteIndex = HashMap<RecordName, String>;

/// Page through every remote entry and index it by title.
///
/// Entries without a readable title are skipped. When two entries share a
/// title the first one seen wins.
pub async fn fetch_index<S: RemoteStore + ?Sized>(store: &S) -> Result<RemoteIndex, SyncError> {
    let mut index = RemoteIndex::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;
    loop {
        let page = store.query(cursor.as_deref()).await?;
        pages += 1;
        for entry in page.entries {
            let Some(title) = title_of(&entry.properties) else {
                tracing::debug!(id = %entry.id, "remote entry has no title, skipping");
                continue;
            };
            index.entry(RecordName::from(title)).or_insert(entry.id);
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    tracing::info!(entries = index.len(), pages, "fetched remote index");
    Ok(index)
}
