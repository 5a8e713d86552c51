//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use hiroba_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use hiroba_shared::time::now_millis;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    command::{InputCommand, chat_message, exit_message, join_message, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Where the user currently is. Survives reconnects so the runner can rejoin.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub username: String,
    pub room_id: Option<String>,
}

/// Run one WebSocket session.
///
/// Returns `Ok(())` when the user quits and `Err` when the connection could
/// not be opened or dropped mid-session.
pub async fn run_client_session(
    url: &str,
    state: &mut SessionState,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Type /help for commands.\n",
        state.username
    );

    let (mut write, mut read) = ws_stream.split();

    // Rejoin the room we were in (or the initial one)
    if let Some(room_id) = &state.room_id {
        send_frame(&mut write, &join_message(room_id, &state.username)).await?;
    }

    // Spawn a task to handle incoming messages
    let username_for_read = state.username.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(msg) => MessageFormatter::format_server_message(
                            &msg,
                            &username_for_read,
                            now_millis(),
                        ),
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let result = loop {
        tokio::select! {
            _ = &mut read_task => {
                break Err(ClientError::ConnectionLost);
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Ctrl+D / Ctrl+C closed the input thread
                    write.send(Message::Close(None)).await.ok();
                    break Ok(());
                };
                match handle_line(&line, state, &mut write).await {
                    Ok(true) => {}
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }
        }
    };

    read_task.abort();
    result
}

/// Act on one input line. Returns `Ok(false)` when the session should end.
async fn handle_line(
    line: &str,
    state: &mut SessionState,
    write: &mut WsWriter,
) -> Result<bool, ClientError> {
    let command = match parse_input(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            redisplay_prompt(&state.username);
            return Ok(true);
        }
    };

    match command {
        InputCommand::Chat(text) => {
            if state.room_id.is_none() {
                println!("Not in a room. Use /join <room> first.");
            } else {
                send_frame(write, &chat_message(text)).await?;
                print!("{}", MessageFormatter::format_sent_confirmation(now_millis()));
            }
        }
        InputCommand::Join(room_id) => {
            // One room per connection: leave the current one first
            if let Some(current) = state.room_id.take() {
                send_frame(write, &exit_message(&current, &state.username)).await?;
            }
            send_frame(write, &join_message(&room_id, &state.username)).await?;
            state.room_id = Some(room_id);
        }
        InputCommand::Exit => match state.room_id.take() {
            Some(current) => {
                send_frame(write, &exit_message(&current, &state.username)).await?;
                println!("Left room '{}'.", current);
            }
            None => println!("Not in a room."),
        },
        InputCommand::Quit => {
            write.send(Message::Close(None)).await.ok();
            return Ok(false);
        }
        InputCommand::Help => println!("{}", MessageFormatter::format_help()),
    }

    redisplay_prompt(&state.username);
    Ok(true)
}

async fn send_frame(write: &mut WsWriter, msg: &ClientMessage) -> Result<(), ClientError> {
    let json = serde_json::to_string(msg)?;
    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send message: {}", e);
        ClientError::ConnectionLost
    })
}
