/// Streaming transcription port traits
///
/// Defines the interface for live speech-to-text sessions.
/// Implementation: Deepgram WebSocket adapter
use crate::domain::models::TranscriptFragment;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Callback for events from a live transcription session.
///
/// Fragments are delivered in the order the service produced them; the
/// session never reorders or deduplicates.
#[async_trait]
pub trait FragmentSink: Send + Sync {
    /// A finalized piece of transcript text arrived.
    async fn on_fragment(&self, fragment: TranscriptFragment);

    /// The session hit an error it could not recover from.
    async fn on_error(&self, error: String);

    /// The session closed (remote end or explicit close).
    async fn on_close(&self);
}

/// A live microphone/transcription session.
///
/// Emits fragments to the sink it was opened with until closed. Sessions
/// are not restartable; open a new one to record again.
#[async_trait]
pub trait LiveSession: Send {
    /// Feed raw audio to the session.
    async fn send_audio(&mut self, audio_chunk: &[u8]) -> Result<()>;

    /// Close the session and stop fragment delivery.
    async fn close(&mut self) -> Result<()>;

    /// Whether the session is still delivering fragments.
    fn is_active(&self) -> bool;
}

/// Port trait for streaming transcription services
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Open a live session that delivers fragments to `sink`.
    ///
    /// Fails with `AppError::SessionOpen` on permission or connectivity
    /// failure; no session exists in that case.
    async fn open_live_session(&self, sink: Arc<dyn FragmentSink>) -> Result<Box<dyn LiveSession>>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
