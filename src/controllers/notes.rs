//! Notes view controller
//!
//! Holds the displayed list of notes for the current identity plus the
//! single active edit session. The list is replaced wholesale on load and
//! mirrored to the store on save/delete; it is not refreshed automatically
//! when the capture controller commits a new note (the store is the only
//! integration point between the two).

use crate::domain::models::{Note, NoteId};
use crate::error::{AppError, Result};
use crate::ports::auth::AuthPort;
use crate::ports::storage::NotesStorePort;
use std::sync::Arc;
use tokio::sync::watch;

/// The one note currently being edited, with its unsaved draft.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub id: NoteId,
    pub draft: String,
}

pub struct NotesController {
    auth: Arc<dyn AuthPort>,
    store: Arc<dyn NotesStorePort>,
    notes: Vec<Note>,
    edit: Option<EditSession>,
}

impl NotesController {
    pub fn new(auth: Arc<dyn AuthPort>, store: Arc<dyn NotesStorePort>) -> Self {
        Self {
            auth,
            store,
            notes: Vec::new(),
            edit: None,
        }
    }

    /// Fetch the current identity's notes and replace the local list
    /// wholesale. Clears the list when signed out.
    pub async fn load(&mut self) -> Result<()> {
        match self.auth.current_identity() {
            Some(user_id) => {
                self.notes = self.store.list_notes(&user_id).await?;
                log::debug!("loaded {} notes for {}", self.notes.len(), user_id);
            }
            None => self.notes.clear(),
        }
        Ok(())
    }

    /// Reload whenever the identity transitions from absent to present.
    /// Runs until the auth provider goes away.
    pub async fn run_identity_watch(
        &mut self,
        mut identity: watch::Receiver<Option<String>>,
    ) -> Result<()> {
        let mut last = identity.borrow().clone();
        while identity.changed().await.is_ok() {
            let current = identity.borrow().clone();
            if last.is_none() && current.is_some() {
                self.load().await?;
            }
            last = current;
        }
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Enter edit mode for one note, drafting its current content. Any
    /// unsaved draft on a previously edited note is silently abandoned.
    pub fn begin_edit(&mut self, id: &NoteId) -> Result<()> {
        let note = self
            .notes
            .iter()
            .find(|n| n.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("note {}", id)))?;
        self.edit = Some(EditSession {
            id: note.id.clone(),
            draft: note.content.clone(),
        });
        Ok(())
    }

    /// Replace the active draft text. No-op when nothing is being edited.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(edit) = &mut self.edit {
            edit.draft = text.into();
        }
    }

    /// Persist the draft for `id`, then update the local copy and exit
    /// edit mode. No-op when signed out. Edit mode is exited even when the
    /// update fails; the local copy only changes on success.
    pub async fn save(&mut self, id: &NoteId) -> Result<()> {
        if self.auth.current_identity().is_none() {
            return Ok(());
        }
        let Some(edit) = self.edit.take() else {
            return Ok(());
        };
        if edit.id != *id {
            self.edit = Some(edit);
            return Err(AppError::InvalidInput(format!(
                "note {} is not being edited",
                id
            )));
        }

        match self.store.update_note(id, &edit.draft).await {
            Ok(()) => {
                if let Some(note) = self.notes.iter_mut().find(|n| n.id == *id) {
                    note.content = edit.draft;
                }
                Ok(())
            }
            Err(e) => {
                log::error!("error saving note {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Delete a note from the store, then drop it from the local list.
    /// No-op when signed out.
    pub async fn delete(&mut self, id: &NoteId) -> Result<()> {
        if self.auth.current_identity().is_none() {
            return Ok(());
        }
        self.store.delete_note(id).await.map_err(|e| {
            log::error!("error deleting note {}: {}", id, e);
            e
        })?;
        self.notes.retain(|n| n.id != *id);
        if self.edit.as_ref().is_some_and(|e| e.id == *id) {
            self.edit = None;
        }
        Ok(())
    }
}
