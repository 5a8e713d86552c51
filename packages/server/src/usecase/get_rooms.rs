//! UseCase: Room 一覧の取得（参照のみ）

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 存在する全ての Room を RoomId 順に返す
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }

    /// 指定した Room を返す（存在しなければ None）
    pub async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        self.repository.get_room(room_id).await
    }

    /// 接続中のクライアント数
    pub async fn count_connections(&self) -> usize {
        self.repository.count_connections().await
    }
}
