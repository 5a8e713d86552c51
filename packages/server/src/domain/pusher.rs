//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（通知）の抽象化。
//!
//! ## 配信保証
//!
//! 送信は fire-and-forget です。送信先のチャンネルが既に閉じている場合は
//! 黙ってスキップされ、再送やキューイングは行いません。ACK もありません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// Outbound channel of one connection. Carries encoded frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信（best effort）
    ///
    /// 閉じているチャンネルはスキップする。実際に送信できた数を返す。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError>;
}
