//! Note repository implementation.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use notebox_core::{Error, NewNote, Note, NoteRepository, NoteType, Result};

use crate::escape_like;

const NOTE_COLUMNS: &str =
    "id, note_type, content, file_name, file_path, mime_type, tags, created_at, updated_at";

/// SQLite implementation of NoteRepository.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Current UTC time as stored in `created_at`/`updated_at`.
///
/// Fixed-width microsecond precision keeps lexical and temporal order equal.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_row_to_note(row: SqliteRow) -> Result<Note> {
    let note_type: String = row.try_get("note_type")?;
    let note_type = note_type.parse::<NoteType>().map_err(Error::Internal)?;

    Ok(Note {
        id: row.try_get("id")?,
        note_type,
        content: row.try_get("content")?,
        file_name: row.try_get("file_name")?,
        file_path: row.try_get("file_path")?,
        mime_type: row.try_get("mime_type")?,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn insert(&self, note: NewNote) -> Result<i64> {
        let now = timestamp_now();

        let result = sqlx::query(
            r#"INSERT INTO notes (note_type, content, file_name, file_path, mime_type, tags, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(note.note_type.as_str())
        .bind(&note.content)
        .bind(&note.file_name)
        .bind(&note.file_path)
        .bind(&note.mime_type)
        .bind(&note.tags)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(
            subsystem = "database",
            component = "notes",
            op = "insert",
            note_id = id,
            note_type = %note.note_type,
            "Inserted note"
        );
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_row_to_note).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM notes ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            NOTE_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_row_to_note).collect()
    }

    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Note>> {
        let pattern = format!("%{}%", escape_like(term));

        let rows = sqlx::query(&format!(
            r#"SELECT {} FROM notes
               WHERE content LIKE ?1 ESCAPE '\'
                  OR tags LIKE ?1 ESCAPE '\'
                  OR file_name LIKE ?1 ESCAPE '\'
               ORDER BY created_at DESC, id DESC
               LIMIT ?2"#,
            NOTE_COLUMNS
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "search",
            query = %term,
            result_count = rows.len(),
            "Searched notes"
        );
        rows.into_iter().map(map_row_to_note).collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
