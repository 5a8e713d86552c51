//! InMemory Room Repository 実装
//!
//! Connection Registry と Room Directory を 1 つの `Mutex` の内側に保持し、
//! ドメイン層の `RoomRepository` trait を実装します。
//!
//! 全ての状態は 1 つのロックで守られるため、`join` / `append_message` / `leave`
//! はそれぞれアトミックに実行されます。プロセス終了とともに全て失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, Connection, ConnectionId, JoinedRoom, LeftRoom, Membership, MessageText,
    PostedMessage, RepositoryError, Room, RoomId, RoomRepository, Timestamp, Username,
};

#[derive(Default)]
struct Directory {
    /// Connection Registry
    connections: HashMap<ConnectionId, Connection>,
    /// Room Directory（メンバーが 1 人以上いる Room のみ）
    rooms: HashMap<RoomId, Room>,
}

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    directory: Mutex<Directory>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut directory = self.directory.lock().await;
        if directory.connections.contains_key(&connection_id) {
            return Err(RepositoryError::DuplicateConnection(connection_id));
        }
        directory
            .connections
            .insert(connection_id, Connection::new(connection_id, connected_at));
        Ok(())
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut directory = self.directory.lock().await;
        directory.connections.remove(connection_id)
    }

    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        username: Username,
        now: Timestamp,
    ) -> Result<JoinedRoom, RepositoryError> {
        let mut directory = self.directory.lock().await;
        let Directory { connections, rooms } = &mut *directory;

        let connection = connections
            .get_mut(connection_id)
            .ok_or(RepositoryError::ConnectionNotFound(*connection_id))?;
        if let Some(current) = &connection.membership
            && current.room_id != room_id
        {
            return Err(RepositoryError::AlreadyInRoom {
                current: current.room_id.clone(),
            });
        }

        let created = !rooms.contains_key(&room_id);
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), now));
        room.add_member(*connection_id);
        room.add_username(username.clone());

        connection.membership = Some(Membership {
            room_id: room_id.clone(),
            username: username.clone(),
        });

        Ok(JoinedRoom {
            room_id,
            username,
            members: room.members().to_vec(),
            usernames: room.usernames().to_vec(),
            history: room.history().to_vec(),
            created,
        })
    }

    async fn append_message(
        &self,
        connection_id: &ConnectionId,
        text: MessageText,
        now: Timestamp,
    ) -> Result<Option<PostedMessage>, RepositoryError> {
        let mut directory = self.directory.lock().await;
        let Directory { connections, rooms } = &mut *directory;

        let connection = connections
            .get(connection_id)
            .ok_or(RepositoryError::ConnectionNotFound(*connection_id))?;
        let Some(Membership { room_id, username }) = connection.membership.clone() else {
            return Ok(None);
        };

        let room = rooms
            .get_mut(&room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.clone()))?;
        let message = ChatMessage::new(username, text, now);
        room.append_message(message.clone());

        Ok(Some(PostedMessage {
            recipients: room.peers_of(connection_id),
            room_id,
            message,
        }))
    }

    async fn leave(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<LeftRoom>, RepositoryError> {
        let mut directory = self.directory.lock().await;
        let Directory { connections, rooms } = &mut *directory;

        let connection = connections
            .get_mut(connection_id)
            .ok_or(RepositoryError::ConnectionNotFound(*connection_id))?;
        let Some(Membership { room_id, username }) = connection.membership.take() else {
            return Ok(None);
        };

        let room = rooms
            .get_mut(&room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.clone()))?;
        room.remove_member(connection_id);
        room.remove_username(&username);

        let remaining = room.members().to_vec();
        let usernames = room.usernames().to_vec();
        let room_deleted = room.is_empty();
        if room_deleted {
            // history and name set go with the room
            rooms.remove(&room_id);
        }

        Ok(Some(LeftRoom {
            room_id,
            username,
            remaining,
            usernames,
            room_deleted,
        }))
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let directory = self.directory.lock().await;
        directory.rooms.get(room_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let directory = self.directory.lock().await;
        let mut rooms: Vec<Room> = directory.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    async fn count_connections(&self) -> usize {
        let directory = self.directory.lock().await;
        directory.connections.len()
    }
}
