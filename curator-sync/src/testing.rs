//! In-memory [`RemoteStore`] for tests and dry experiments.
//!
//! Keeps entries in insertion order, pages them with a configurable page
//! size, records every call, and can be told to fail for specific names.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::json;

use crate::properties::{PropertyMap, PropertyValue, NAME};
use crate::remote::{RemoteEntry, RemotePage, RemoteStore};
use crate::SyncError;

/// Record of a call made to the memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Query { cursor: Option<String> },
    Create { name: String },
    Update { id: String, name: String },
    Archive { id: String },
}

#[derive(Debug, Clone)]
struct StoredEntry {
    id: String,
    name: String,
    archived: bool,
}

/// A remote store living in memory.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<Vec<StoredEntry>>>,
    calls: Arc<RwLock<Vec<StoreCall>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(100)
    }
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Arc::default(),
            calls: Arc::default(),
            failing: Arc::default(),
            page_size: page_size.max(1),
        }
    }

    /// Seed an existing live entry.
    pub fn with_entry(self, name: &str) -> Self {
        self.insert(name);
        self
    }

    /// Make every write touching `name` (or the entry with that id) fail.
    pub fn fail_on(self, name_or_id: &str) -> Self {
        write(&self.failing).insert(name_or_id.to_string());
        self
    }

    /// Names of entries that are not archived, in insertion order.
    pub fn live_names(&self) -> Vec<String> {
        read(&self.entries)
            .iter()
            .filter(|e| !e.archived)
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn id_of(&self, name: &str) -> Option<String> {
        read(&self.entries)
            .iter()
            .find(|e| e.name == name && !e.archived)
            .map(|e| e.id.clone())
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        read(&self.calls).clone()
    }

    /// Calls that changed remote state (everything except queries).
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, StoreCall::Query { .. }))
            .collect()
    }

    pub fn clear_calls(&self) {
        write(&self.calls).clear();
    }

    fn insert(&self, name: &str) -> String {
        let mut entries = write(&self.entries);
        let id = format!("page-{}", entries.len() + 1);
        entries.push(StoredEntry {
            id: id.clone(),
            name: name.to_string(),
            archived: false,
        });
        id
    }

    fn check_failure(&self, key: &str) -> Result<(), SyncError> {
        if read(&self.failing).contains(key) {
            return Err(SyncError::Api {
                status: 500,
                message: format!("injected failure for {key}"),
            });
        }
        Ok(())
    }
}

fn title(properties: &PropertyMap) -> String {
    match properties.get(NAME) {
        Some(PropertyValue::Title(text)) => text.clone(),
        _ => String::new(),
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn query(&self, cursor: Option<&str>) -> Result<RemotePage, SyncError> {
        write(&self.calls).push(StoreCall::Query {
            cursor: cursor.map(str::to_string),
        });
        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let live: Vec<StoredEntry> = read(&self.entries)
            .iter()
            .filter(|e| !e.archived)
            .cloned()
            .collect();
        let end = (start + self.page_size).min(live.len());
        let entries = live[start.min(end)..end]
            .iter()
            .map(|e| RemoteEntry {
                id: e.id.clone(),
                properties: json!({
                    NAME: { "type": "title", "title": [{ "plain_text": e.name }] }
                }),
            })
            .collect();
        Ok(RemotePage {
            entries,
            next_cursor: (end < live.len()).then(|| end.to_string()),
        })
    }

    async fn create(&self, properties: &PropertyMap) -> Result<String, SyncError> {
        let name = title(properties);
        write(&self.calls).push(StoreCall::Create { name: name.clone() });
        self.check_failure(&name)?;
        Ok(self.insert(&name))
    }

    async fn update(&self, id: &str, properties: &PropertyMap) -> Result<(), SyncError> {
        let name = title(properties);
        write(&self.calls).push(StoreCall::Update {
            id: id.to_string(),
            name: name.clone(),
        });
        self.check_failure(&name)?;
        self.check_failure(id)?;
        let mut entries = write(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| SyncError::Api {
                status: 404,
                message: format!("no page {id}"),
            })?;
        entry.name = name;
        Ok(())
    }

    async fn archive(&self, id: &str) -> Result<(), SyncError> {
        write(&self.calls).push(StoreCall::Archive { id: id.to_string() });
        self.check_failure(id)?;
        let mut entries = write(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| SyncError::Api {
                status: 404,
                message: format!("no page {id}"),
            })?;
        entry.archived = true;
        Ok(())
    }
}
