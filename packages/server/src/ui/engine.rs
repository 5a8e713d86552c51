//! Presence & broadcast engine.
//!
//! Every connection forwards its commands into one channel. A single task
//! drains that channel and runs each command to completion (state change and
//! all outbound pushes) before taking the next one, so events from different
//! connections never interleave.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ClientEvent, ConnectionId, PusherChannel},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, JoinError, JoinRoomUseCase,
        LeaveRoomUseCase, SendChatUseCase,
    },
};

/// Command processed by the engine task.
#[derive(Debug)]
pub enum EngineCommand {
    /// Transport accepted a new connection
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    /// Decoded frame from a client
    Event {
        connection_id: ConnectionId,
        event: ClientEvent,
    },
    /// Transport closed
    Disconnect { connection_id: ConnectionId },
}

/// Cloneable sender side of the engine.
///
/// Sending never blocks. Commands from one handle are processed in the order
/// they were sent.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    pub fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.send(EngineCommand::Connect {
            connection_id,
            sender,
        });
    }

    pub fn dispatch(&self, connection_id: ConnectionId, event: ClientEvent) {
        self.send(EngineCommand::Event {
            connection_id,
            event,
        });
    }

    pub fn disconnect(&self, connection_id: ConnectionId) {
        self.send(EngineCommand::Disconnect { connection_id });
    }

    fn send(&self, command: EngineCommand) {
        if let Err(e) = self.tx.send(command) {
            tracing::warn!("Presence engine is not running, dropped {:?}", e.0);
        }
    }
}

/// Usecases driven by the engine.
pub struct EngineUseCases {
    pub connect_client: Arc<ConnectClientUseCase>,
    pub join_room: Arc<JoinRoomUseCase>,
    pub send_chat: Arc<SendChatUseCase>,
    pub leave_room: Arc<LeaveRoomUseCase>,
    pub disconnect_client: Arc<DisconnectClientUseCase>,
}

/// Owner of the event loop. Run it with [`PresenceEngine::run`].
pub struct PresenceEngine {
    usecases: EngineUseCases,
    rx: mpsc::UnboundedReceiver<EngineCommand>,
}

impl PresenceEngine {
    pub fn new(usecases: EngineUseCases) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { usecases, rx }, EngineHandle { tx })
    }

    /// Process commands until every [`EngineHandle`] has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("Presence engine started");
        while let Some(command) = self.rx.recv().await {
            self.handle(command).await;
        }
        tracing::info!("Presence engine stopped");
    }

    async fn handle(&self, command: EngineCommand) {
        match command {
            EngineCommand::Connect {
                connection_id,
                sender,
            } => match self
                .usecases
                .connect_client
                .execute(connection_id, sender)
                .await
            {
                Ok(_) => tracing::info!("Client '{}' connected", connection_id),
                Err(e) => tracing::error!("Failed to register '{}': {}", connection_id, e),
            },
            EngineCommand::Event {
                connection_id,
                event,
            } => self.handle_event(connection_id, event).await,
            EngineCommand::Disconnect { connection_id } => {
                match self.usecases.disconnect_client.execute(connection_id).await {
                    Ok(Some(left)) => tracing::info!(
                        "Client '{}' ({}) disconnected from room '{}'",
                        connection_id,
                        left.username,
                        left.room_id
                    ),
                    Ok(None) => tracing::info!("Client '{}' disconnected", connection_id),
                    Err(e) => {
                        tracing::warn!("Failed to clean up '{}': {}", connection_id, e)
                    }
                }
            }
        }
    }

    async fn handle_event(&self, connection_id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::Join { room_id, username } => {
                match self
                    .usecases
                    .join_room
                    .execute(connection_id, room_id, username)
                    .await
                {
                    Ok(joined) => tracing::info!(
                        "'{}' joined room '{}' as '{}' ({} members)",
                        connection_id,
                        joined.room_id,
                        joined.username,
                        joined.members.len()
                    ),
                    Err(e @ JoinError::AlreadyInRoom { .. }) => {
                        tracing::warn!("Rejected join from '{}': {}", connection_id, e)
                    }
                    Err(e) => tracing::error!("Join from '{}' failed: {}", connection_id, e),
                }
            }
            ClientEvent::Chat { text } => {
                match self.usecases.send_chat.execute(connection_id, text).await {
                    Ok(Some(posted)) => tracing::debug!(
                        "'{}' posted to room '{}' ({} recipients)",
                        posted.message.from,
                        posted.room_id,
                        posted.recipients.len()
                    ),
                    Ok(None) => {}
                    Err(e) => tracing::error!("Chat from '{}' failed: {}", connection_id, e),
                }
            }
            ClientEvent::Exit => match self.usecases.leave_room.execute(connection_id).await {
                Ok(Some(left)) => tracing::info!(
                    "'{}' left room '{}'",
                    left.username,
                    left.room_id
                ),
                Ok(None) => {}
                Err(e) => tracing::error!("Exit from '{}' failed: {}", connection_id, e),
            },
        }
    }
}
