//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加時の通知の順序と宛先
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者（Room 作成、空の履歴）
//! - 正常系：既存の Room への参加（他のメンバーへの joined 通知）
//! - 異常系：別の Room に参加中の接続からの参加

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinedRoom, MessagePusher, RepositoryError, RoomId, RoomRepository, ServerEvent,
    Timestamp, Username,
};

use super::{error::JoinError, notify};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Room への参加を実行
    ///
    /// 通知は次の順序で送信される:
    ///
    /// 1. `joined` を他のメンバーへ
    /// 2. `self-joined` を参加者本人へ
    /// 3. `users`（名前一覧）を参加者を含む全メンバーへ
    /// 4. `chat-history`（全履歴）を参加者本人へ
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        username: Username,
    ) -> Result<JoinedRoom, JoinError> {
        let now = Timestamp::new(self.clock.now_millis());
        let joined = self
            .repository
            .join(&connection_id, room_id.clone(), username, now)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyInRoom { current } => JoinError::AlreadyInRoom {
                    current,
                    requested: room_id,
                },
                other => JoinError::Repository(other),
            })?;

        if joined.created {
            tracing::info!("Room '{}' created", joined.room_id);
        }

        let pusher = self.message_pusher.as_ref();
        let peers: Vec<ConnectionId> = joined
            .members
            .iter()
            .filter(|id| **id != connection_id)
            .copied()
            .collect();

        notify::broadcast(
            pusher,
            peers,
            &ServerEvent::Joined {
                room_id: joined.room_id.clone(),
                username: joined.username.clone(),
            },
        )
        .await;
        notify::push(
            pusher,
            &connection_id,
            &ServerEvent::SelfJoined {
                room_id: joined.room_id.clone(),
                username: joined.username.clone(),
            },
        )
        .await;
        notify::broadcast(
            pusher,
            joined.members.clone(),
            &ServerEvent::Users {
                users: joined.usernames.clone(),
            },
        )
        .await;
        notify::push(
            pusher,
            &connection_id,
            &ServerEvent::ChatHistory {
                messages: joined.history.clone(),
            },
        )
        .await;

        Ok(joined)
    }
}
