//! Deepgram live transcription adapter
//!
//! Implements TranscriptionPort over Deepgram's streaming WebSocket API.
//! Reference: https://developers.deepgram.com/docs/live-streaming-audio
//!
//! Only finalized results are forwarded to the sink; interim results are
//! display candy the accumulation logic must not see twice.

use crate::domain::models::TranscriptFragment;
use crate::error::{AppError, Result};
use crate::ports::transcription::{FragmentSink, LiveSession, TranscriptionPort};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message};

const DEEPGRAM_STREAMING_URL: &str = "wss://api.deepgram.com/v1/listen";

type WsSink = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

/// Deepgram streaming transcription provider
pub struct DeepgramTranscription {
    api_key: String,
    model: String,
    language: Option<String>,
}

impl DeepgramTranscription {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "nova-2".to_string(),
            language: Some("en".to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn session_url(&self) -> String {
        let mut url = format!("{}?model={}", DEEPGRAM_STREAMING_URL, self.model);
        url.push_str("&punctuate=true");
        if let Some(lang) = &self.language {
            url.push_str(&format!("&language={}", lang));
        }
        // Raw PCM as fed through send_audio
        url.push_str("&encoding=linear16&sample_rate=16000&channels=1");
        url
    }
}

#[async_trait]
impl TranscriptionPort for DeepgramTranscription {
    async fn open_live_session(&self, sink: Arc<dyn FragmentSink>) -> Result<Box<dyn LiveSession>> {
        let session = DeepgramLiveSession::open(&self.api_key, &self.session_url(), sink).await?;
        Ok(Box::new(session))
    }

    fn provider_name(&self) -> &str {
        "Deepgram"
    }
}

/// One live WebSocket session
pub struct DeepgramLiveSession {
    ws_sender: Arc<Mutex<Option<WsSink>>>,
    is_active: Arc<Mutex<bool>>,
    receiver_task: Option<tokio::task::JoinHandle<()>>,
}

impl DeepgramLiveSession {
    async fn open(api_key: &str, url: &str, sink: Arc<dyn FragmentSink>) -> Result<Self> {
        log::info!("connecting to Deepgram: {}", url);

        let request = tokio_tungstenite::tungstenite::http::Request::builder()
            .uri(url)
            .header("Authorization", format!("Token {}", api_key))
            .body(())
            .map_err(|e| AppError::SessionOpen(format!("failed to build request: {}", e)))?;

        let (ws_stream, _) = connect_async(request)
            .await
            .map_err(|e| AppError::SessionOpen(format!("WebSocket connection failed: {}", e)))?;

        let (write, mut read) = ws_stream.split();
        let ws_sender = Arc::new(Mutex::new(Some(write)));
        let is_active = Arc::new(Mutex::new(true));

        let is_active_clone = Arc::clone(&is_active);
        let receiver_task = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<StreamingResponse>(&text) {
                            Ok(response) => {
                                if !response.is_final.unwrap_or(false) {
                                    continue;
                                }
                                let transcript = response
                                    .channel
                                    .as_ref()
                                    .and_then(|c| c.alternatives.first())
                                    .map(|a| a.transcript.as_str())
                                    .unwrap_or("");
                                if !transcript.is_empty() {
                                    sink.on_fragment(TranscriptFragment {
                                        text: transcript.to_string(),
                                    })
                                    .await;
                                }
                            }
                            Err(e) => {
                                log::warn!("unparseable Deepgram message: {}", e);
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("Deepgram closed the session");
                        *is_active_clone.lock().await = false;
                        sink.on_close().await;
                        break;
                    }
                    Err(e) => {
                        log::error!("WebSocket error: {}", e);
                        *is_active_clone.lock().await = false;
                        sink.on_error(e.to_string()).await;
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            ws_sender,
            is_active,
            receiver_task: Some(receiver_task),
        })
    }
}

#[async_trait]
impl LiveSession for DeepgramLiveSession {
    async fn send_audio(&mut self, audio_chunk: &[u8]) -> Result<()> {
        let mut sender = self.ws_sender.lock().await;
        match sender.as_mut() {
            Some(ws) => ws
                .send(Message::Binary(audio_chunk.to_vec()))
                .await
                .map_err(|e| AppError::Transcription(format!("failed to send audio: {}", e))),
            None => Err(AppError::Transcription(
                "WebSocket connection is closed".to_string(),
            )),
        }
    }

    async fn close(&mut self) -> Result<()> {
        log::info!("closing Deepgram session");
        *self.is_active.lock().await = false;

        let mut sender = self.ws_sender.lock().await;
        if let Some(mut ws) = sender.take() {
            let _ = ws.send(Message::Close(None)).await;
            let _ = ws.close().await;
        }
        drop(sender);

        if let Some(task) = self.receiver_task.take() {
            let _ = task.await;
        }

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.try_lock().map(|guard| *guard).unwrap_or(false)
    }
}

impl Drop for DeepgramLiveSession {
    fn drop(&mut self) {
        if let Some(task) = self.receiver_task.take() {
            task.abort();
        }
    }
}

// ===== Deepgram streaming API response types =====

#[derive(Debug, Deserialize)]
struct StreamingResponse {
    channel: Option<Channel>,
    is_final: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}
