//! UseCase: Room からの退出と切断
//!
//! 明示的な `exit` と、トランスポートの切断は同じ退出処理を行います。
//! 切断の場合は、退出後に接続そのものを Registry と MessagePusher から削除します。
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：退出すると残りのメンバーに left と users が届く
//! - 正常系：最後のメンバーの退出で Room が削除される
//! - エッジケース：未参加での退出は何もしない
//! - 切断：参加中・未参加どちらでも接続が削除される

use std::sync::Arc;

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ConnectionId, LeftRoom, MessagePusher, RoomRepository, ServerEvent};

use super::{error::LeaveError, notify};

/// 退出したことを残りのメンバーに通知（left → users の順）
async fn notify_left(pusher: &dyn MessagePusher, left: &LeftRoom) {
    notify::broadcast(
        pusher,
        left.remaining.clone(),
        &ServerEvent::Left {
            room_id: left.room_id.clone(),
            username: left.username.clone(),
        },
    )
    .await;
    notify::broadcast(
        pusher,
        left.remaining.clone(),
        &ServerEvent::Users {
            users: left.usernames.clone(),
        },
    )
    .await;

    if left.room_deleted {
        tracing::info!("Room '{}' is empty and was removed", left.room_id);
    }
}

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 退出を実行
    ///
    /// 未参加の場合は `Ok(None)`。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
    ) -> Result<Option<LeftRoom>, LeaveError> {
        let left = self.repository.leave(&connection_id).await?;
        match &left {
            Some(left) => notify_left(self.message_pusher.as_ref(), left).await,
            None => tracing::debug!("Ignored exit from '{}': not in a room", connection_id),
        }
        Ok(left)
    }
}

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// Room に参加中なら退出処理を行い、その後接続を削除する。
    /// 退出処理が失敗しても接続の削除は必ず行う。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
    ) -> Result<Option<LeftRoom>, LeaveError> {
        let left = self.repository.leave(&connection_id).await;
        if let Ok(Some(left)) = &left {
            notify_left(self.message_pusher.as_ref(), left).await;
        }

        self.message_pusher.unregister_client(&connection_id).await;
        if let Some(connection) = self.repository.unregister_connection(&connection_id).await {
            tracing::debug!(
                "Unregistered '{}' (connected at {})",
                connection.id,
                timestamp_to_rfc3339(connection.connected_at.value())
            );
        }

        left.map_err(LeaveError::from)
    }
}
