//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `ServerEvent` を JSON フレームにエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、送信のみを担当します。
//! sender の先（WebSocket への書き込みタスク）が終了している場合、
//! 送信は失敗し、その接続はスキップされます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::codec::encode_server_event,
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
    encode_server_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or(MessagePushError::ClientNotFound(*connection_id))?;
        sender
            .send(content)
            .map_err(|_| MessagePushError::ChannelClosed(*connection_id))?;
        tracing::debug!("Pushed '{}' to client '{}'", event.kind(), connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in &targets {
            match clients.get(target) {
                // ブロードキャストでは閉じたチャンネルを黙ってスキップ
                Some(sender) if sender.send(content.clone()).is_ok() => delivered += 1,
                Some(_) => {
                    tracing::debug!("Channel for client '{}' is closed, skipping", target);
                }
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {}/{} clients",
            event.kind(),
            delivered,
            targets.len()
        );

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, Username};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信、閉じたチャンネルのスキップ
    // - エラーハンドリング（存在しないクライアント、閉じたチャンネル）
    // ========================================

    fn joined_event() -> ServerEvent {
        ServerEvent::Joined {
            room_id: RoomId::new("R1".to_string()).unwrap(),
            username: Username::new("bob".to_string()).unwrap(),
        }
    }

    const JOINED_JSON: &str = r#"{"type":"joined","payload":{"roomId":"R1","username":"bob"}}"#;

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにエンコード済みイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        pusher.register_client(alice, tx).await;

        // when (操作):
        let result = pusher.push_to(&alice, &joined_event()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(JOINED_JSON.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let nobody = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(&nobody, &joined_event()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ClientNotFound(nobody)));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel() {
        // テスト項目: 受信側が閉じたチャンネルへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        pusher.register_client(alice, tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&alice, &joined_event()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ChannelClosed(alice)));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_and_unknown_clients() {
        // テスト項目: ブロードキャストは閉じた・未登録のクライアントをスキップする
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_open, mut rx_open) = mpsc::unbounded_channel();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();
        let open = ConnectionId::generate();
        let closed = ConnectionId::generate();
        let unknown = ConnectionId::generate();
        pusher.register_client(open, tx_open).await;
        pusher.register_client(closed, tx_closed).await;
        drop(rx_closed);

        // when (操作):
        let result = pusher
            .broadcast(vec![open, closed, unknown], &joined_event())
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert_eq!(rx_open.recv().await, Some(JOINED_JSON.to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], &joined_event()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除したクライアントには送信できない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        pusher.register_client(alice, tx).await;

        // when (操作):
        pusher.unregister_client(&alice).await;
        let result = pusher.push_to(&alice, &joined_event()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ClientNotFound(alice)));
    }
}
