//! ASR (Automatic Speech Recognition) service adapters
//!
//! One provider today: Deepgram's live WebSocket API.

mod deepgram_streaming;

pub use deepgram_streaming::DeepgramTranscription;
