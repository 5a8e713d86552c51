//! Client execution logic with reconnection support.

use std::time::Duration;

use hiroba_server::domain::{RoomId, Username};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use super::{
    error::ClientError,
    session::{SessionState, run_client_session},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client with reconnection logic.
///
/// After a reconnect the client joins whatever room it was in when the
/// connection dropped.
pub async fn run_client(
    url: String,
    room_id: String,
    username: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let room_id = RoomId::new(room_id).map_err(ClientError::from)?;
    let username = Username::new(username).map_err(ClientError::from)?;

    let mut state = SessionState {
        username: username.into_string(),
        room_id: Some(room_id.into_string()),
    };
    let mut input_rx = spawn_readline(state.username.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            state.username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut state, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        reconnect_count
                    );
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

/// Check if the client should attempt to reconnect.
fn should_attempt_reconnect(error: &ClientError, current_attempt: u32, max_attempts: u32) -> bool {
    match error {
        ClientError::InvalidArgument(_) | ClientError::Encode(_) => false,
        ClientError::ConnectionError(_) | ClientError::ConnectionLost => {
            current_attempt < max_attempts
        }
    }
}

/// Spawn a blocking thread for rustyline (synchronous readline).
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline failure.
fn spawn_readline(username: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
