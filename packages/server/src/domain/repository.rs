//! Repository trait 定義
//!
//! Connection Registry と Room Directory へのアクセスをドメイン層が定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! `join` / `append_message` / `leave` は複数の状態（Registry, Room のメンバー、
//! 名前集合、履歴）をまとめて変更するため、実装は各操作をアトミックに行うこと。

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, JoinedRoom, LeftRoom, MessageText, PostedMessage, RepositoryError,
    Room, RoomId, Timestamp, Username,
};

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 接続を Registry に登録（未参加状態）
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// 接続を Registry から削除
    ///
    /// Room からの退出は行わない。先に `leave` を呼ぶこと。
    /// 削除した接続を返す（未登録なら None）。
    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// Room に参加（Room が無ければ作成）
    ///
    /// 同じ Room への再参加ではメンバー集合は変わらず、ユーザー名は上書きされる。
    /// 別の Room に参加中の場合は `RepositoryError::AlreadyInRoom` を返し、何も変更しない。
    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        username: Username,
        now: Timestamp,
    ) -> Result<JoinedRoom, RepositoryError>;

    /// 参加中の Room の履歴にメッセージを追加
    ///
    /// 未参加の場合は `Ok(None)`（何も変更しない）。
    async fn append_message(
        &self,
        connection_id: &ConnectionId,
        text: MessageText,
        now: Timestamp,
    ) -> Result<Option<PostedMessage>, RepositoryError>;

    /// 参加中の Room から退出
    ///
    /// 未参加の場合は `Ok(None)`。最後のメンバーが退出した Room は即座に削除される。
    async fn leave(&self, connection_id: &ConnectionId)
    -> Result<Option<LeftRoom>, RepositoryError>;

    /// Room を取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ての Room を取得（RoomId 順）
    async fn list_rooms(&self) -> Vec<Room>;

    /// 接続中のクライアント数を取得
    async fn count_connections(&self) -> usize;
}
