//! Voice capture controller
//!
//! Owns the recording state machine: Idle -> (start) -> Recording ->
//! (stop) -> Idle. While recording, transcript fragments from the live
//! session accumulate into a buffer; stop commits the trimmed buffer as a
//! note for the current identity.

use crate::domain::models::{NewNote, Note, StopOutcome, TranscriptFragment};
use crate::error::{AppError, Result};
use crate::ports::auth::AuthPort;
use crate::ports::storage::NotesStorePort;
use crate::ports::transcription::{FragmentSink, LiveSession, TranscriptionPort};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

/// Accumulated transcript for the recording in progress.
///
/// The recording flag gates appends: fragments that straggle in after stop
/// (the session tears down asynchronously) are dropped instead of leaking
/// into the next recording.
struct TranscriptBuffer {
    text: StdMutex<String>,
    recording: AtomicBool,
}

impl TranscriptBuffer {
    fn new() -> Self {
        Self {
            text: StdMutex::new(String::new()),
            recording: AtomicBool::new(false),
        }
    }

    fn append(&self, fragment: &str) {
        if !self.recording.load(Ordering::SeqCst) {
            log::debug!("dropping fragment received while not recording");
            return;
        }
        let mut text = self.text.lock().unwrap();
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(fragment);
    }

    /// Clears the buffer and returns what it held.
    fn take(&self) -> String {
        std::mem::take(&mut *self.text.lock().unwrap())
    }

    fn snapshot(&self) -> String {
        self.text.lock().unwrap().clone()
    }
}

/// Sink registered with the live session; appends fragments in delivery
/// order.
struct BufferSink {
    buffer: Arc<TranscriptBuffer>,
}

#[async_trait]
impl FragmentSink for BufferSink {
    async fn on_fragment(&self, fragment: TranscriptFragment) {
        self.buffer.append(&fragment.text);
    }

    async fn on_error(&self, error: String) {
        log::error!("transcription session error: {}", error);
    }

    async fn on_close(&self) {
        log::debug!("transcription session closed");
    }
}

/// The recording state machine.
pub struct CaptureController {
    auth: Arc<dyn AuthPort>,
    store: Arc<dyn NotesStorePort>,
    transcription: Arc<dyn TranscriptionPort>,
    session: Mutex<Option<Box<dyn LiveSession>>>,
    buffer: Arc<TranscriptBuffer>,
}

impl CaptureController {
    pub fn new(
        auth: Arc<dyn AuthPort>,
        store: Arc<dyn NotesStorePort>,
        transcription: Arc<dyn TranscriptionPort>,
    ) -> Self {
        Self {
            auth,
            store,
            transcription,
            session: Mutex::new(None),
            buffer: Arc::new(TranscriptBuffer::new()),
        }
    }

    /// Start recording.
    ///
    /// Errors with `AlreadyRecording` if a session is active, or with
    /// `SessionOpen` if the transcription collaborator cannot open one; in
    /// both cases the controller stays (or returns to) Idle.
    pub async fn start(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Err(AppError::AlreadyRecording);
        }

        self.buffer.recording.store(true, Ordering::SeqCst);
        let sink = Arc::new(BufferSink {
            buffer: Arc::clone(&self.buffer),
        });

        match self.transcription.open_live_session(sink).await {
            Ok(live) => {
                *session = Some(live);
                log::info!(
                    "recording started via {}",
                    self.transcription.provider_name()
                );
                Ok(())
            }
            Err(e) => {
                self.buffer.recording.store(false, Ordering::SeqCst);
                log::error!("error starting recording: {}", e);
                Err(e)
            }
        }
    }

    /// Stop recording and commit the transcript.
    ///
    /// The controller is Idle from the moment this is entered, before the
    /// persistence write resolves. The transcript buffer is cleared
    /// unconditionally, whether the commit succeeds, fails, or is skipped.
    pub async fn stop(&self) -> Result<StopOutcome> {
        let mut live = {
            let mut session = self.session.lock().await;
            let live = session.take().ok_or(AppError::NotRecording)?;
            self.buffer.recording.store(false, Ordering::SeqCst);
            live
        };

        if let Err(e) = live.close().await {
            log::warn!("error closing transcription session: {}", e);
        }

        let transcript = self.buffer.take();
        let content = transcript.trim();

        let Some(user_id) = self.auth.current_identity() else {
            log::info!("discarding transcript: no authenticated identity");
            return Ok(StopOutcome::SkippedNoIdentity);
        };
        if content.is_empty() {
            log::debug!("nothing to commit: transcript empty");
            return Ok(StopOutcome::SkippedEmpty);
        }

        let new_note = NewNote::now(user_id, content);
        let id = self.store.create_note(&new_note).await.map_err(|e| {
            log::error!("error committing note: {}", e);
            e
        })?;
        log::info!("committed note {} ({} chars)", id, new_note.content.len());

        Ok(StopOutcome::Saved(Note {
            id,
            user_id: new_note.user_id,
            content: new_note.content,
            timestamp: new_note.timestamp,
        }))
    }

    pub fn is_recording(&self) -> bool {
        self.buffer.recording.load(Ordering::SeqCst)
    }

    /// The transcript accumulated so far, for live display while recording.
    pub fn transcript_preview(&self) -> String {
        self.buffer.snapshot()
    }

    /// Feed raw audio to the active session.
    pub async fn send_audio(&self, audio_chunk: &[u8]) -> Result<()> {
        let mut session = self.session.lock().await;
        match session.as_mut() {
            Some(live) => live.send_audio(audio_chunk).await,
            None => Err(AppError::NotRecording),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::WatchAuth;
    use crate::ports::mocks::{ManualTranscription, MockNotesStore};

    fn controller(
        identity: Option<&str>,
    ) -> (CaptureController, ManualTranscription, MockNotesStore) {
        let auth = Arc::new(WatchAuth::new());
        if let Some(id) = identity {
            auth.sign_in(id);
        }
        let transcription = ManualTranscription::new();
        let store = MockNotesStore::new();
        let capture = CaptureController::new(
            auth,
            Arc::new(store.clone()),
            Arc::new(transcription.clone()),
        );
        (capture, transcription, store)
    }

    #[tokio::test]
    async fn test_fragments_accumulate_space_separated() {
        let (capture, transcription, store) = controller(Some("u1"));

        capture.start().await.unwrap();
        transcription.deliver("hello").await;
        transcription.deliver("world").await;

        let outcome = capture.stop().await.unwrap();
        match outcome {
            StopOutcome::Saved(note) => {
                assert_eq!(note.content, "hello world");
                assert_eq!(note.user_id, "u1");
            }
            other => panic!("expected Saved, got {:?}", other),
        }

        let notes = store.all_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "hello world");
    }

    #[tokio::test]
    async fn test_whitespace_fragments_are_trimmed() {
        let (capture, transcription, _store) = controller(Some("u1"));

        capture.start().await.unwrap();
        transcription.deliver("  hello").await;
        transcription.deliver("world  ").await;

        match capture.stop().await.unwrap() {
            StopOutcome::Saved(note) => assert_eq!(note.content, "hello world"),
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_transcript_is_not_committed() {
        let (capture, _transcription, store) = controller(Some("u1"));

        capture.start().await.unwrap();
        let outcome = capture.stop().await.unwrap();

        assert_eq!(outcome, StopOutcome::SkippedEmpty);
        assert!(store.all_notes().is_empty());
        assert!(!capture.is_recording());
        assert_eq!(capture.transcript_preview(), "");
    }

    #[tokio::test]
    async fn test_no_identity_skips_commit_and_clears_buffer() {
        let (capture, transcription, store) = controller(None);

        capture.start().await.unwrap();
        transcription.deliver("hello").await;
        let outcome = capture.stop().await.unwrap();

        assert_eq!(outcome, StopOutcome::SkippedNoIdentity);
        assert!(store.all_notes().is_empty());
        assert_eq!(capture.transcript_preview(), "");
    }

    #[tokio::test]
    async fn test_start_while_recording_is_an_error() {
        let (capture, _transcription, _store) = controller(Some("u1"));

        capture.start().await.unwrap();
        assert!(matches!(
            capture.start().await,
            Err(AppError::AlreadyRecording)
        ));
        // First session is untouched
        assert!(capture.is_recording());
    }

    #[tokio::test]
    async fn test_session_open_failure_stays_idle() {
        let (capture, transcription, _store) = controller(Some("u1"));
        transcription.fail_open(true);

        assert!(matches!(capture.start().await, Err(AppError::SessionOpen(_))));
        assert!(!capture.is_recording());

        // Recoverable: a later start succeeds
        transcription.fail_open(false);
        capture.start().await.unwrap();
        assert!(capture.is_recording());
    }

    #[tokio::test]
    async fn test_commit_failure_is_returned_and_buffer_cleared() {
        let (capture, transcription, store) = controller(Some("u1"));
        store.fail_writes(true);

        capture.start().await.unwrap();
        transcription.deliver("hello").await;
        let result = capture.stop().await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert!(!capture.is_recording());
        assert_eq!(capture.transcript_preview(), "");
    }

    #[tokio::test]
    async fn test_fragments_after_stop_are_dropped() {
        let (capture, transcription, _store) = controller(Some("u1"));

        capture.start().await.unwrap();
        capture.stop().await.unwrap();
        transcription.deliver("late").await;

        capture.start().await.unwrap();
        transcription.deliver("fresh").await;
        match capture.stop().await.unwrap() {
            StopOutcome::Saved(note) => assert_eq!(note.content, "fresh"),
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_an_error() {
        let (capture, _transcription, _store) = controller(Some("u1"));
        assert!(matches!(capture.stop().await, Err(AppError::NotRecording)));
    }

    #[tokio::test]
    async fn test_send_audio_requires_active_session() {
        let (capture, _transcription, _store) = controller(Some("u1"));
        assert!(matches!(
            capture.send_audio(&[0u8; 4]).await,
            Err(AppError::NotRecording)
        ));

        capture.start().await.unwrap();
        capture.send_audio(&[0u8; 4]).await.unwrap();
    }
}
