/// Domain layer - core business models
///
/// These models are platform-agnostic and represent core business entities.
pub mod models;

pub use models::{NewNote, Note, NoteId, StopOutcome, TranscriptFragment};
