//! # Data Storage Abstraction
//!
//! This module defines the storage contract the dispatcher relies on and an in-memory
//! implementation of it.  The durable implementation lives in [`crate::sql`].
//!
//! ## Contract
//!
//! - `insert` assigns a fresh identifier.  Identifiers are unique per kind, immutable,
//!   and never handed out again after the record is deleted.
//! - `get`, `update` and `delete` address a record by kind and id.
//! - `list` returns every record of a kind in insertion order.
//! - Each write is complete when the call returns; readers see either the prior value or
//!   the fully-applied write.
//!
//! ## Usage Examples
//!
//! ```rust
//! use audio_catalog::{AudioKind, DataStore, InMemoryDataStore, Song};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = InMemoryDataStore::new();
//! let song = Song { name: "song1".to_string(), duration: 100 };
//!
//! let id = store.insert(&song.into()).await.unwrap();
//! assert_eq!(id, 1);
//!
//! let stored = store.get(AudioKind::Song, id).await.unwrap().unwrap();
//! assert_eq!(stored.id, 1);
//!
//! assert!(store.delete(AudioKind::Song, id).await.unwrap());
//! assert!(store.list(AudioKind::Song).await.unwrap().is_empty());
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::{AudioFields, AudioKind, DataStoreError, StoredAudio};

/// Storage interface for catalog entries.
///
/// Implementors must be safe to share across request handlers.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Stores a new record and returns its identifier.
    ///
    /// The kind is taken from `fields`.
    async fn insert(&self, fields: &AudioFields) -> Result<i64, DataStoreError>;

    /// Retrieves a record.
    ///
    /// # Returns
    /// * `Ok(Some(StoredAudio))` - Record found
    /// * `Ok(None)` - No record of this kind has this id
    /// * `Err(DataStoreError::Internal)` - Internal storage error
    async fn get(&self, kind: AudioKind, id: i64) -> Result<Option<StoredAudio>, DataStoreError>;

    /// Lists every record of a kind, oldest first.
    async fn list(&self, kind: AudioKind) -> Result<Vec<StoredAudio>, DataStoreError>;

    /// Replaces the fields of an existing record.
    ///
    /// # Returns
    /// * `Ok(true)` - Record existed and was updated
    /// * `Ok(false)` - Record did not exist
    /// * `Err(DataStoreError::Internal)` - Internal storage error
    async fn update(&self, id: i64, fields: &AudioFields) -> Result<bool, DataStoreError>;

    /// Removes a record.
    ///
    /// # Returns
    /// * `Ok(true)` - Record existed and was deleted
    /// * `Ok(false)` - Record did not exist
    /// * `Err(DataStoreError::Internal)` - Internal storage error
    async fn delete(&self, kind: AudioKind, id: i64) -> Result<bool, DataStoreError>;

    /// Number of records of a kind.
    async fn count(&self, kind: AudioKind) -> Result<usize, DataStoreError> {
        Ok(self.list(kind).await?.len())
    }
}

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, StoredAudio>,
}

#[derive(Default)]
struct Tables {
    songs: Table,
    podcasts: Table,
    audiobooks: Table,
}

impl Tables {
    fn table(&mut self, kind: AudioKind) -> &mut Table {
        match kind {
            AudioKind::Song => &mut self.songs,
            AudioKind::Podcast => &mut self.podcasts,
            AudioKind::Audiobook => &mut self.audiobooks,
        }
    }
}

/// Thread-safe in-memory implementation of [`DataStore`].
///
/// Records are kept in per-kind ordered maps behind a single `Mutex`.  Because ids are
/// taken from a per-kind counter that only moves forward, iterating a map by key is
/// iterating in insertion order.  Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryDataStore {
    tables: Mutex<Tables>,
}

impl InMemoryDataStore {
    /// Creates a new empty in-memory data store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, DataStoreError> {
        self.tables
            .lock()
            .map_err(|_| DataStoreError::Internal("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DataStore for InMemoryDataStore {
    async fn insert(&self, fields: &AudioFields) -> Result<i64, DataStoreError> {
        let mut tables = self.lock()?;
        let table = tables.table(fields.kind());
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            StoredAudio {
                id,
                uploaded_time: Utc::now(),
                fields: fields.clone(),
            },
        );
        Ok(id)
    }

    async fn get(&self, kind: AudioKind, id: i64) -> Result<Option<StoredAudio>, DataStoreError> {
        let mut tables = self.lock()?;
        Ok(tables.table(kind).rows.get(&id).cloned())
    }

    async fn list(&self, kind: AudioKind) -> Result<Vec<StoredAudio>, DataStoreError> {
        let mut tables = self.lock()?;
        Ok(tables.table(kind).rows.values().cloned().collect())
    }

    async fn update(&self, id: i64, fields: &AudioFields) -> Result<bool, DataStoreError> {
        let mut tables = self.lock()?;
        match tables.table(fields.kind()).rows.get_mut(&id) {
            Some(row) => {
                row.fields = fields.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, kind: AudioKind, id: i64) -> Result<bool, DataStoreError> {
        let mut tables = self.lock()?;
        Ok(tables.table(kind).rows.remove(&id).is_some())
    }

    async fn count(&self, kind: AudioKind) -> Result<usize, DataStoreError> {
        let mut tables = self.lock()?;
        Ok(tables.table(kind).rows.len())
    }
}
