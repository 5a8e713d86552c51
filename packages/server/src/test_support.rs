//! Helpers shared by unit tests.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessagePusher, RoomId, RoomRepository, Timestamp, Username},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
};

pub(crate) fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub(crate) fn name(value: &str) -> Username {
    Username::new(value.to_string()).unwrap()
}

/// Registered connection whose outbound frames can be inspected.
pub(crate) struct TestClient {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// Take every frame pushed so far, decoded as JSON.
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    /// Close the receiving side, as a dead transport would.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

pub(crate) struct Fixture {
    pub repository: Arc<InMemoryRoomRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::new()),
            pusher: Arc::new(WebSocketMessagePusher::new()),
        }
    }

    pub async fn connect(&self) -> TestClient {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.repository
            .register_connection(id, Timestamp::new(0))
            .await
            .unwrap();
        self.pusher.register_client(id, tx).await;
        TestClient { id, rx }
    }
}
