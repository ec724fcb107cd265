//! Mock implementations for testing

use crate::domain::models::{NewNote, Note, NoteId, TranscriptFragment};
use crate::error::{AppError, Result};
use crate::ports::storage::NotesStorePort;
use crate::ports::transcription::{FragmentSink, LiveSession, TranscriptionPort};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock note store for testing
#[derive(Clone, Default)]
pub struct MockNotesStore {
    notes: Arc<Mutex<Vec<Note>>>,
    next_id: Arc<Mutex<i64>>,
    fail_writes: Arc<Mutex<bool>>,
    /// Every (id, content) pair passed to update_note, in call order.
    pub update_calls: Arc<Mutex<Vec<(NoteId, String)>>>,
}

impl MockNotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with existing notes.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let store = Self::default();
        *store.notes.lock().unwrap() = notes;
        store
    }

    /// Make every subsequent write operation fail.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn all_notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    fn next_id(&self) -> NoteId {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        format!("note-{}", id)
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            Err(AppError::Persistence("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotesStorePort for MockNotesStore {
    async fn list_notes(&self, user_id: &str) -> Result<Vec<Note>> {
        let mut list: Vec<_> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(list)
    }

    async fn create_note(&self, note: &NewNote) -> Result<NoteId> {
        self.check_writable()?;
        let id = self.next_id();
        self.notes.lock().unwrap().push(Note {
            id: id.clone(),
            user_id: note.user_id.clone(),
            content: note.content.clone(),
            timestamp: note.timestamp.clone(),
        });
        Ok(id)
    }

    async fn update_note(&self, id: &NoteId, content: &str) -> Result<()> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.clone(), content.to_string()));
        self.check_writable()?;
        if let Some(note) = self.notes.lock().unwrap().iter_mut().find(|n| n.id == *id) {
            note.content = content.to_string();
        }
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        self.check_writable()?;
        self.notes.lock().unwrap().retain(|n| n.id != *id);
        Ok(())
    }
}

/// Transcription mock whose sessions are driven by the test itself: the
/// test delivers fragments through the sink the controller registered.
#[derive(Clone, Default)]
pub struct ManualTranscription {
    sink: Arc<Mutex<Option<Arc<dyn FragmentSink>>>>,
    fail_open: Arc<Mutex<bool>>,
}

impl ManualTranscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make open_live_session fail, simulating permission denial.
    pub fn fail_open(&self, fail: bool) {
        *self.fail_open.lock().unwrap() = fail;
    }

    /// Deliver one fragment to the currently registered sink.
    pub async fn deliver(&self, text: &str) {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.on_fragment(TranscriptFragment {
                text: text.to_string(),
            })
            .await;
        }
    }
}

#[async_trait]
impl TranscriptionPort for ManualTranscription {
    async fn open_live_session(&self, sink: Arc<dyn FragmentSink>) -> Result<Box<dyn LiveSession>> {
        if *self.fail_open.lock().unwrap() {
            return Err(AppError::SessionOpen(
                "microphone permission denied".to_string(),
            ));
        }
        *self.sink.lock().unwrap() = Some(Arc::clone(&sink));
        Ok(Box::new(ManualSession { sink, active: true }))
    }

    fn provider_name(&self) -> &str {
        "manual"
    }
}

struct ManualSession {
    sink: Arc<dyn FragmentSink>,
    active: bool,
}

#[async_trait]
impl LiveSession for ManualSession {
    async fn send_audio(&mut self, _audio_chunk: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.active = false;
        self.sink.on_close().await;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
