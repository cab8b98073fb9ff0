//! Persistent override store consulted before the volatile cache.
//!
//! Records here hold a stable upstream reference that never expires, so an
//! eligible collection can skip the slow forward-and-inspect round trip.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anemone_core::ContentId;
use serde::{Deserialize, Serialize};

use crate::{CacheKey, StoreError};

/// Durable record for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// Reference that can be exchanged for a temporary URL at any time.
    pub stable_reference: String,
    /// Caption text.
    #[serde(default)]
    pub caption: Option<String>,
    /// Unix timestamp of the original publication.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Pixel width.
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height.
    #[serde(default)]
    pub height: Option<u32>,
}

/// Read-only view of the override store.
pub trait OverrideStore: Send + Sync {
    /// Look up the record for an identifier of a collection.
    fn lookup(&self, collection: &str, content_id: ContentId) -> Option<OverrideRecord>;
}

/// Row of the JSON file accepted by [`MemoryOverrideStore::load_json`].
#[derive(Debug, Deserialize)]
struct StoredRow {
    collection: String,
    content_id: ContentId,
    #[serde(flatten)]
    record: OverrideRecord,
}

/// Mutex-guarded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
    records: Mutex<HashMap<CacheKey, OverrideRecord>>,
}

impl MemoryOverrideStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON array of
    /// `{collection, content_id, stable_reference, caption?, timestamp?, width?, height?}`.
    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let rows: Vec<StoredRow> = serde_json::from_str(&fs::read_to_string(path)?)?;
        let store = Self::new();
        for row in rows {
            store.insert(&row.collection, row.content_id, row.record);
        }
        Ok(store)
    }

    /// Add or replace a record.
    pub fn insert(&self, collection: &str, content_id: ContentId, record: OverrideRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(CacheKey::new(collection, content_id), record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns true when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OverrideStore for MemoryOverrideStore {
    fn lookup(&self, collection: &str, content_id: ContentId) -> Option<OverrideRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&CacheKey::new(collection, content_id))
            .cloned()
    }
}
