//! voxnote binary
//!
//! Wires the real adapters (SQLite store, Deepgram transcription,
//! watch-channel auth) to the controllers and drives them from a small
//! line-oriented shell on stdin. Microphone plumbing is host-specific and
//! lives outside this crate; audio can be piped in via `send_audio` by an
//! embedding shell.

use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use voxnote::adapters::auth::WatchAuth;
use voxnote::adapters::services::asr::DeepgramTranscription;
use voxnote::adapters::storage::SqliteStore;
use voxnote::controllers::{CaptureController, NotesController};
use voxnote::domain::StopOutcome;
use voxnote::ports::storage::NotesStorePort;
use voxnote::utils::keychain::{KeychainManager, KeychainPort};

const KEY_PROVIDER: &str = "deepgram";
const KEY_ENV_VAR: &str = "VOXNOTE_DEEPGRAM_API_KEY";

fn api_key() -> anyhow::Result<String> {
    if let Ok(key) = std::env::var(KEY_ENV_VAR) {
        return Ok(key);
    }
    KeychainManager::new().get_api_key(KEY_PROVIDER).context(format!(
        "no Deepgram API key: set {} or run `voxnote set-key <key>`",
        KEY_ENV_VAR
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // `voxnote set-key <key>` stores the API key in the OS keychain
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("set-key") {
        let key = args.get(2).context("usage: voxnote set-key <key>")?;
        KeychainManager::new().save_api_key(KEY_PROVIDER, key)?;
        println!("API key stored");
        return Ok(());
    }

    let db_path = std::env::var("VOXNOTE_DB").unwrap_or_else(|_| "voxnote.db".to_string());
    let sqlite = SqliteStore::new(db_path.clone().into())
        .with_context(|| format!("failed to open database at {}", db_path))?;
    sqlite.run_migrations()?;
    let store: Arc<dyn NotesStorePort> = Arc::new(sqlite);

    let auth = Arc::new(WatchAuth::new());
    if let Ok(user) = std::env::var("VOXNOTE_USER") {
        auth.sign_in(user);
    }

    let transcription = Arc::new(DeepgramTranscription::new(api_key()?));
    let capture = CaptureController::new(auth.clone(), Arc::clone(&store), transcription);
    let mut notes = NotesController::new(auth.clone(), Arc::clone(&store));
    notes.load().await?;

    println!("voxnote - commands: login <user> | logout | record | stop | preview | list | edit <id> <content> | delete <id> | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let result = match command {
            "" => Ok(()),
            "login" if !rest.is_empty() => {
                auth.sign_in(rest);
                notes.load().await
            }
            "logout" => {
                auth.sign_out();
                notes.load().await
            }
            "record" => capture.start().await,
            "stop" => match capture.stop().await {
                Ok(StopOutcome::Saved(note)) => {
                    println!("saved note {}: {}", note.id, note.content);
                    // New notes only show up on an explicit reload
                    notes.load().await
                }
                Ok(StopOutcome::SkippedEmpty) => {
                    println!("nothing transcribed, nothing saved");
                    Ok(())
                }
                Ok(StopOutcome::SkippedNoIdentity) => {
                    println!("not signed in, transcript discarded");
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "preview" => {
                println!("{}", capture.transcript_preview());
                Ok(())
            }
            "list" => {
                for note in notes.notes() {
                    println!("{}  [{}]  {}", note.id, note.timestamp, note.content);
                }
                Ok(())
            }
            "edit" => match rest.split_once(' ') {
                Some((id, content)) => {
                    let id = id.to_string();
                    match notes.begin_edit(&id) {
                        Ok(()) => {
                            notes.set_draft(content);
                            notes.save(&id).await
                        }
                        Err(e) => Err(e),
                    }
                }
                None => {
                    println!("usage: edit <id> <content>");
                    Ok(())
                }
            },
            "delete" if !rest.is_empty() => notes.delete(&rest.to_string()).await,
            "quit" | "exit" => break,
            _ => {
                println!("unknown command: {}", line);
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("error: {}", e);
        }
    }

    Ok(())
}
