//! UseCase: 接続の登録
//!
//! トランスポートが受け付けた接続を Connection Registry と MessagePusher に登録します。
//! 登録直後の接続はどの Room にも参加していません。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, RoomRepository, Timestamp};

use super::error::ConnectError;

/// 接続登録のユースケース
pub struct ConnectClientUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
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

    /// 接続を登録し、接続時刻を返す
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());
        self.repository
            .register_connection(connection_id, connected_at)
            .await?;
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(connected_at)
    }
}
