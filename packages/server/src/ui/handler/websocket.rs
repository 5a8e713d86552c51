//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::{mpsc, watch};

use crate::{domain::ConnectionId, infrastructure::codec::decode_client_event, ui::state::AppState};

/// How long a session closing for shutdown waits for its close frame to go out
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and writes them to the WebSocket.
///
/// The task ends when writing to the socket fails, or when the channel closes
/// (the connection was unregistered), in which case a close frame is sent.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        sender.send(Message::Close(None)).await.ok();
    })
}

/// Resolves once the server starts shutting down (or the server is gone).
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    // Registration is queued ahead of any event from this connection
    state.engine.connect(connection_id, tx);

    let (sender, mut receiver) = socket.split();
    let engine = state.engine.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match decode_client_event(&text) {
                    Ok(event) => {
                        tracing::debug!("Received {:?} from '{}'", event, connection_id);
                        engine.dispatch(connection_id, event);
                    }
                    Err(e) => {
                        tracing::warn!("Dropped malformed frame from '{}': {}", connection_id, e);
                    }
                },
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignored binary frame ({} bytes) from '{}'",
                        data.len(),
                        connection_id
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    // Spawn a task to forward events for this client to its socket
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    let shutting_down = tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            false
        }
        _ = &mut send_task => {
            recv_task.abort();
            false
        }
        _ = wait_for_shutdown(state.shutdown.clone()) => {
            recv_task.abort();
            true
        }
    };

    state.engine.disconnect(connection_id);

    if shutting_down {
        // The pusher loop sends the close frame once the engine unregisters us
        if tokio::time::timeout(CLOSE_TIMEOUT, send_task).await.is_err() {
            tracing::debug!("Close frame to '{}' timed out", connection_id);
        }
        tracing::info!("Closed '{}' for shutdown", connection_id);
    }
}
