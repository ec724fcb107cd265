/// SQLite storage adapter
///
/// Implements NotesStorePort for a local SQLite database. Ids are assigned
/// here (uuid v4), never by the controllers. Listing is ordered newest
/// first so the view has a deterministic order.
use crate::domain::models::{NewNote, Note, NoteId};
use crate::error::{AppError, Result};
use crate::ports::storage::NotesStorePort;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// SQLite-backed note store
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a new store with the given database path
    pub fn new(db_path: PathBuf) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> Result<()> {
        use rusqlite_migration::{Migrations, M};

        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../../migrations/001_initial.sql"
        ))]);

        let mut conn = self.conn.lock().unwrap();
        migrations
            .to_latest(&mut conn)
            .map_err(|e| AppError::Persistence(format!("migration failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl NotesStorePort for SqliteStore {
    async fn list_notes(&self, user_id: &str) -> Result<Vec<Note>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, content, timestamp
             FROM notes WHERE user_id = ?1 ORDER BY timestamp DESC",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Note {
                id: row.get(0)?,
                user_id: row.get(1)?,
                content: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;

        let mut notes = Vec::new();
        for note_result in rows {
            notes.push(note_result?);
        }

        Ok(notes)
    }

    async fn create_note(&self, note: &NewNote) -> Result<NoteId> {
        let id = uuid::Uuid::new_v4().to_string();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO notes (id, user_id, content, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, note.user_id, note.content, note.timestamp],
        )?;
        Ok(id)
    }

    async fn update_note(&self, id: &NoteId, content: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE notes SET content = ?1 WHERE id = ?2",
            params![content, id],
        )?;
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(())
    }
}
