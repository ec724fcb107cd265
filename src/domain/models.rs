/// Domain models for voxnote
///
/// These models represent core business entities and are store-agnostic.
use serde::{Deserialize, Serialize};

/// Opaque note identifier, assigned by the persistence adapter on creation.
pub type NoteId = String;

/// A persisted unit of transcribed text owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub user_id: String,
    pub content: String,
    /// ISO-8601 creation time. Set once at creation, never updated.
    pub timestamp: String,
}

/// Payload for creating a note. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub user_id: String,
    pub content: String,
    pub timestamp: String,
}

impl NewNote {
    /// Creates a create payload stamped with the current time.
    pub fn now(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A single piece of transcribed text delivered during a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
}

/// Result of stopping a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The transcript was committed as this note.
    Saved(Note),
    /// Nothing to commit: the trimmed transcript was empty.
    SkippedEmpty,
    /// No authenticated identity was present at stop time.
    SkippedNoIdentity,
}
