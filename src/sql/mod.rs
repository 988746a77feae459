//! SQLite database operations for the audio catalog.
//!
//! This module provides [`SqliteDataStore`], the durable [`DataStore`], together with
//! the per-table functions it is built from.  The table functions take an open
//! transaction so that callers decide where the commit happens; the store commits
//! every write before returning.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::{AudioFields, AudioKind, DataStore, DataStoreError, StoredAudio};

/// Audiobook table operations.
pub mod audiobook;

/// Podcast table operations.
pub mod podcast;

/// Song table operations.
pub mod song;

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// [`DataStore`] backed by a SQLite connection pool.
///
/// The schema is created by the embedded migrations when the store is opened.
#[derive(Clone)]
pub struct SqliteDataStore {
    pool: SqlitePool,
}

impl SqliteDataStore {
    /// Opens (creating if missing) the database at `url` and applies the schema.
    ///
    /// # Examples
    /// ```no_run
    /// # use audio_catalog::sql::SqliteDataStore;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = SqliteDataStore::connect("sqlite://audio_catalog.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> SqlResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to a single connection that is never recycled, because every
    /// SQLite in-memory connection is its own database.
    pub async fn connect_in_memory() -> SqlResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying the schema first.
    pub async fn from_pool(pool: SqlitePool) -> SqlResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DataStore for SqliteDataStore {
    async fn insert(&self, fields: &AudioFields) -> Result<i64, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let id = match fields {
            AudioFields::Song(s) => song::create(&mut tx, s).await?,
            AudioFields::Podcast(p) => podcast::create(&mut tx, p).await?,
            AudioFields::Audiobook(b) => audiobook::create(&mut tx, b).await?,
        };
        tx.commit().await?;
        Ok(id)
    }

    async fn get(&self, kind: AudioKind, id: i64) -> Result<Option<StoredAudio>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let record = match kind {
            AudioKind::Song => song::get(&mut tx, id).await?,
            AudioKind::Podcast => podcast::get(&mut tx, id).await?,
            AudioKind::Audiobook => audiobook::get(&mut tx, id).await?,
        };
        tx.commit().await?;
        Ok(record)
    }

    async fn list(&self, kind: AudioKind) -> Result<Vec<StoredAudio>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let records = match kind {
            AudioKind::Song => song::list(&mut tx).await?,
            AudioKind::Podcast => podcast::list(&mut tx).await?,
            AudioKind::Audiobook => audiobook::list(&mut tx).await?,
        };
        tx.commit().await?;
        Ok(records)
    }

    async fn update(&self, id: i64, fields: &AudioFields) -> Result<bool, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let updated = match fields {
            AudioFields::Song(s) => song::update(&mut tx, id, s).await?,
            AudioFields::Podcast(p) => podcast::update(&mut tx, id, p).await?,
            AudioFields::Audiobook(b) => audiobook::update(&mut tx, id, b).await?,
        };
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, kind: AudioKind, id: i64) -> Result<bool, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = match kind {
            AudioKind::Song => song::delete(&mut tx, id).await?,
            AudioKind::Podcast => podcast::delete(&mut tx, id).await?,
            AudioKind::Audiobook => audiobook::delete(&mut tx, id).await?,
        };
        tx.commit().await?;
        Ok(deleted)
    }
}
