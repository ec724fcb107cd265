/// Storage port trait
///
/// Defines the interface for the note document store.
/// Implementation: SQLite adapter
use crate::domain::models::{NewNote, Note, NoteId};
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for note storage operations
#[async_trait]
pub trait NotesStorePort: Send + Sync {
    /// List all notes owned by a user, newest first.
    async fn list_notes(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Create a note and return the id the store assigned to it.
    async fn create_note(&self, note: &NewNote) -> Result<NoteId>;

    /// Replace the content of an existing note.
    async fn update_note(&self, id: &NoteId, content: &str) -> Result<()>;

    /// Delete a note by id.
    async fn delete_note(&self, id: &NoteId) -> Result<()>;
}
