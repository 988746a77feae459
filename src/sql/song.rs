//! Song operations for SQLite.
//!
//! This module provides functions for managing rows of the `songs` table.  Every
//! function runs inside a caller-provided transaction.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use super::SqlResult;
use crate::{DataStoreError, Song, StoredAudio};

/// Inserts a song and returns its new identifier.
///
/// The `uploaded_time` column is set to the current time.
///
/// # Arguments
/// * `tx` - SQLite transaction
/// * `song` - The validated song fields
///
/// # Returns
/// * `Ok(i64)` - Identifier assigned by the database
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(tx: &mut Transaction<'_, Sqlite>, song: &Song) -> SqlResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (name, duration, uploaded_time)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(&song.name)
    .bind(song.duration)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(e) => {
            tracing::error!(error = %e, "database error creating song");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Retrieves a song by id.
///
/// # Returns
/// * `Ok(Some(StoredAudio))` - Song found
/// * `Ok(None)` - Song not found
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Option<StoredAudio>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, duration, uploaded_time
        FROM songs
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Lists all songs, oldest first.
pub async fn list(tx: &mut Transaction<'_, Sqlite>) -> SqlResult<Vec<StoredAudio>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, duration, uploaded_time
        FROM songs
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Overwrites the fields of a song.
///
/// # Returns
/// * `Ok(true)` - Song existed and was updated
/// * `Ok(false)` - Song did not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn update(tx: &mut Transaction<'_, Sqlite>, id: i64, song: &Song) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE songs
        SET name = ?1, duration = ?2
        WHERE id = ?3
        "#,
    )
    .bind(&song.name)
    .bind(song.duration)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a song.
///
/// # Returns
/// * `Ok(true)` - Song existed and was deleted
/// * `Ok(false)` - Song did not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn delete(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn from_row(row: &SqliteRow) -> SqlResult<StoredAudio> {
    let uploaded_time: DateTime<Utc> = row.try_get("uploaded_time")?;
    Ok(StoredAudio {
        id: row.try_get("id")?,
        uploaded_time,
        fields: Song {
            name: row.try_get("name")?,
            duration: row.try_get("duration")?,
        }
        .into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::tests::setup_test_db;

    fn song(name: &str, duration: i64) -> Song {
        Song {
            name: name.to_string(),
            duration,
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = setup_test_db().await;
        let before = Utc::now();

        let mut tx = store.pool().begin().await.unwrap();
        let id = create(&mut tx, &song("song1", 100)).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.pool().begin().await.unwrap();
        let record = get(&mut tx, id).await.unwrap().unwrap();
        tx.commit().await.unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.fields, song("song1", 100).into());
        assert!(record.uploaded_time >= before);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = setup_test_db().await;

        let mut tx = store.pool().begin().await.unwrap();
        let id = create(&mut tx, &song("song1", 100)).await.unwrap();
        assert!(update(&mut tx, id, &song("song1", 300)).await.unwrap());
        assert!(!update(&mut tx, id + 1, &song("x", 1)).await.unwrap());
        tx.commit().await.unwrap();

        let mut tx = store.pool().begin().await.unwrap();
        let record = get(&mut tx, id).await.unwrap().unwrap();
        assert_eq!(record.fields, song("song1", 300).into());
        assert!(delete(&mut tx, id).await.unwrap());
        assert!(!delete(&mut tx, id).await.unwrap());
        assert!(get(&mut tx, id).await.unwrap().is_none());
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = setup_test_db().await;

        let mut tx = store.pool().begin().await.unwrap();
        create(&mut tx, &song("a", 1)).await.unwrap();
        create(&mut tx, &song("b", 2)).await.unwrap();
        create(&mut tx, &song("c", 3)).await.unwrap();
        let songs = list(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        let ids: Vec<i64> = songs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
