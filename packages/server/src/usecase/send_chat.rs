//! UseCase: チャットメッセージ送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatUseCase::execute() メソッド
//! - 履歴への追加と、送信者以外への chat-new 配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じ Room の他のメンバーにのみ配信される（送信者へのエコーなし）
//! - エッジケース：未参加の接続からの送信は無視される
//! - エッジケース：送信者のみが参加している場合（配信対象なし）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, MessageText, PostedMessage, RoomRepository, ServerEvent,
    Timestamp,
};

use super::{error::SendChatError, notify};

/// メッセージ送信のユースケース
pub struct SendChatUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendChatUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(PostedMessage))` - 履歴に追加され、配信された
    /// * `Ok(None)` - 未参加のため無視された
    /// * `Err(SendChatError)` - Repository のエラー
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        text: MessageText,
    ) -> Result<Option<PostedMessage>, SendChatError> {
        let now = Timestamp::new(self.clock.now_millis());
        let Some(posted) = self
            .repository
            .append_message(&connection_id, text, now)
            .await?
        else {
            tracing::debug!("Ignored chat from '{}': not in a room", connection_id);
            return Ok(None);
        };

        notify::broadcast(
            self.message_pusher.as_ref(),
            posted.recipients.clone(),
            &ServerEvent::ChatNew {
                message: posted.message.clone(),
            },
        )
        .await;

        Ok(Some(posted))
    }
}
