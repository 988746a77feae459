//! Audiobook operations for SQLite.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use super::SqlResult;
use crate::{Audiobook, DataStoreError, StoredAudio};

/// Inserts an audiobook and returns its new identifier.
pub async fn create(tx: &mut Transaction<'_, Sqlite>, book: &Audiobook) -> SqlResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO audiobooks (title, author, narrator, duration, uploaded_time)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.narrator)
    .bind(book.duration)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(e) => {
            tracing::error!(error = %e, "database error creating audiobook");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Retrieves an audiobook by id.
pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Option<StoredAudio>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, author, narrator, duration, uploaded_time
        FROM audiobooks
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Lists all audiobooks, oldest first.
pub async fn list(tx: &mut Transaction<'_, Sqlite>) -> SqlResult<Vec<StoredAudio>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, author, narrator, duration, uploaded_time
        FROM audiobooks
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Overwrites the fields of an audiobook; `Ok(false)` when it does not exist.
pub async fn update(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    book: &Audiobook,
) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE audiobooks
        SET title = ?1, author = ?2, narrator = ?3, duration = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.narrator)
    .bind(book.duration)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes an audiobook; `Ok(false)` when it does not exist.
pub async fn delete(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM audiobooks WHERE id = ?1")
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
        fields: Audiobook {
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            narrator: row.try_get("narrator")?,
            duration: row.try_get("duration")?,
        }
        .into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::tests::setup_test_db;

    #[tokio::test]
    async fn create_get_delete() {
        let store = setup_test_db().await;
        let book = Audiobook {
            title: "audiobook1".to_string(),
            author: "author1".to_string(),
            narrator: "narrator1".to_string(),
            duration: 1000,
        };

        let mut tx = store.pool().begin().await.unwrap();
        let id = create(&mut tx, &book).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.pool().begin().await.unwrap();
        let record = get(&mut tx, id).await.unwrap().unwrap();
        assert_eq!(record.fields, book.into());
        assert!(delete(&mut tx, id).await.unwrap());
        assert!(list(&mut tx).await.unwrap().is_empty());
        tx.commit().await.unwrap();
    }
}
