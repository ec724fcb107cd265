/// Port trait definitions (interfaces)
///
/// These traits define the contracts the core consumes from its external
/// collaborators (auth, transcription, persistence).
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod auth;
pub mod storage;
pub mod transcription;

#[cfg(test)]
pub mod mocks;

pub use auth::AuthPort;
pub use storage::NotesStorePort;
pub use transcription::{FragmentSink, LiveSession, TranscriptionPort};
