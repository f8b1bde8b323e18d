mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Row};

use crate::models::*;
use crate::tags;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "jotter")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("jotter.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Note operations
    // ============================================================

    /// All notes, most recently updated first.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, content, tags, event_date, event_time, created_at, updated_at
             FROM notes ORDER BY updated_at DESC",
        )?;

        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, content, tags, event_date, event_time, created_at, updated_at
             FROM notes WHERE id = ?",
        )?;

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(note_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Insert a note. The caller has already validated title and content;
    /// the id and both timestamps are assigned here.
    pub fn create_note(
        &self,
        title: String,
        content: String,
        note_tags: Vec<String>,
        event_date: Option<String>,
        event_time: Option<String>,
    ) -> Result<Note> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (title, content, tags, event_date, event_time, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                &title,
                &content,
                tags::encode(&note_tags),
                &event_date,
                &event_time,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            title,
            content,
            tags: note_tags,
            event_date,
            event_time,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Only supplied fields are overwritten; tags,
    /// event_date and event_time can be cleared with an explicit null.
    /// `updated_at` is always refreshed.
    pub fn update_note(&self, id: i64, input: UpdateNoteInput) -> Result<Option<Note>> {
        let Some(existing) = self.get_note(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let title = input.title.unwrap_or(existing.title);
        let content = input.content.unwrap_or(existing.content);
        let existing_tags = (!existing.tags.is_empty()).then_some(existing.tags);
        let note_tags = input.tags.resolve(existing_tags).unwrap_or_default();
        let event_date = input.event_date.resolve(existing.event_date);
        let event_time = input.event_time.resolve(existing.event_time);

        conn.execute(
            "UPDATE notes SET title = ?, content = ?, tags = ?, event_date = ?, event_time = ?, updated_at = ?
             WHERE id = ?",
            (
                &title,
                &content,
                tags::encode(&note_tags),
                &event_date,
                &event_time,
                now.to_rfc3339(),
                id,
            ),
        )?;

        Ok(Some(Note {
            id,
            title,
            content,
            tags: note_tags,
            event_date,
            event_time,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    pub fn delete_note(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM notes WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    /// Substring search over title, content and the raw stored tag text,
    /// most recently updated first. The empty-query short-circuit lives in
    /// the handler, not here.
    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, content, tags, event_date, event_time, created_at, updated_at
             FROM notes
             WHERE title LIKE '%' || ?1 || '%'
                OR content LIKE '%' || ?1 || '%'
                OR IFNULL(tags, '') LIKE '%' || ?1 || '%'
             ORDER BY updated_at DESC",
        )?;

        let notes = stmt
            .query_map([query], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        tags: tags::decode(row.get::<_, Option<String>>(3)?.as_deref()),
        event_date: row.get(4)?,
        event_time: row.get(5)?,
        created_at: parse_datetime(row.get::<_, String>(6)?),
        updated_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
