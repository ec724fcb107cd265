/// Application controllers
///
/// The two state machines of the app: voice capture and the notes view.
/// They do not talk to each other; the note store is their only shared
/// integration point.
pub mod capture;
pub mod notes;

pub use capture::CaptureController;
pub use notes::{EditSession, NotesController};
