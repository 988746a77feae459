//! Podcast operations for SQLite.
//!
//! Participants are stored in a single TEXT column using the
//! [`Participants`](crate::Participants) codec.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use super::SqlResult;
use crate::{DataStoreError, Participants, Podcast, StoredAudio};

/// Inserts a podcast and returns its new identifier.
///
/// # Returns
/// * `Ok(i64)` - Identifier assigned by the database
/// * `Err(DataStoreError::SerializationError)` - Participants could not be encoded
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(tx: &mut Transaction<'_, Sqlite>, podcast: &Podcast) -> SqlResult<i64> {
    let participants = podcast.participants.encode()?;

    let result = sqlx::query(
        r#"
        INSERT INTO podcasts (name, duration, host, participants, uploaded_time)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&podcast.name)
    .bind(podcast.duration)
    .bind(&podcast.host)
    .bind(participants)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(e) => {
            tracing::error!(error = %e, "database error creating podcast");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Retrieves a podcast by id, decoding its participants.
pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Option<StoredAudio>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, duration, host, participants, uploaded_time
        FROM podcasts
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Lists all podcasts, oldest first.
pub async fn list(tx: &mut Transaction<'_, Sqlite>) -> SqlResult<Vec<StoredAudio>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, duration, host, participants, uploaded_time
        FROM podcasts
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Overwrites the fields of a podcast.
///
/// # Returns
/// * `Ok(true)` - Podcast existed and was updated
/// * `Ok(false)` - Podcast did not exist
pub async fn update(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    podcast: &Podcast,
) -> SqlResult<bool> {
    let participants = podcast.participants.encode()?;

    let result = sqlx::query(
        r#"
        UPDATE podcasts
        SET name = ?1, duration = ?2, host = ?3, participants = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&podcast.name)
    .bind(podcast.duration)
    .bind(&podcast.host)
    .bind(participants)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a podcast.
pub async fn delete(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM podcasts WHERE id = ?1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn from_row(row: &SqliteRow) -> SqlResult<StoredAudio> {
    let uploaded_time: DateTime<Utc> = row.try_get("uploaded_time")?;
    let participants: String = row.try_get("participants")?;
    Ok(StoredAudio {
        id: row.try_get("id")?,
        uploaded_time,
        fields: Podcast {
            name: row.try_get("name")?,
            duration: row.try_get("duration")?,
            host: row.try_get("host")?,
            participants: Participants::decode(&participants)?,
        }
        .into(),
    })
}
