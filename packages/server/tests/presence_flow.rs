//! End-to-end tests: a real server on an ephemeral port driven by real
//! WebSocket clients.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::RoomRepository,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{EngineUseCases, PresenceEngine, Server},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRoomsUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, SendChatUseCase,
    },
};
use hiroba_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Running server bound to 127.0.0.1:0. Dropping it shuts the server down.
struct TestServer {
    addr: SocketAddr,
    repository: Arc<InMemoryRoomRepository>,
    shutdown: Option<oneshot::Sender<()>>,
    serve_task: JoinHandle<()>,
    engine_task: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let clock = Arc::new(SystemClock);

        let usecases = EngineUseCases {
            connect_client: Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock.clone(),
            )),
            join_room: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock.clone(),
            )),
            send_chat: Arc::new(SendChatUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock,
            )),
            leave_room: Arc::new(LeaveRoomUseCase::new(repository.clone(), pusher.clone())),
            disconnect_client: Arc::new(DisconnectClientUseCase::new(repository.clone(), pusher)),
        };
        let get_rooms = Arc::new(GetRoomsUseCase::new(repository.clone()));

        let (engine, handle) = PresenceEngine::new(usecases);
        let engine_task = tokio::spawn(engine.run());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = Server::new(handle, get_rooms);
        let serve_task = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            repository,
            shutdown: Some(shutdown_tx),
            serve_task,
            engine_task,
        }
    }

    /// Fire the shutdown signal, as Ctrl+C would
    fn trigger_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> Ws {
        let (ws, _) = connect_async(self.ws_url()).await.unwrap();
        ws
    }

    async fn rooms(&self) -> Value {
        reqwest::get(self.http_url("/api/rooms"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Poll /api/rooms until `done` holds, failing the test after RECV_TIMEOUT
    async fn wait_for_rooms(&self, done: impl Fn(&Value) -> bool) -> Value {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let rooms = self.rooms().await;
            if done(&rooms) {
                return rooms;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "rooms never reached the expected state: {}",
                rooms
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

async fn send(ws: &mut Ws, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

async fn join(ws: &mut Ws, room_id: &str, username: &str) {
    send(
        ws,
        json!({"type": "join", "payload": {"roomId": room_id, "username": username}}),
    )
    .await;
}

/// Next text frame as JSON, failing the test after RECV_TIMEOUT
async fn recv(ws: &mut Ws) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Assert nothing arrives for QUIET_PERIOD
async fn assert_silent(ws: &mut Ws) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(QUIET_PERIOD, ws.next()).await
    {
        panic!("unexpected frame: {}", text);
    }
}

fn users(names: &[&str]) -> Value {
    json!({"type": "users", "payload": {"users": names}})
}

#[tokio::test]
async fn test_two_users_join_chat_and_exit() {
    // テスト項目: alice と bob が R1 に入室し、チャットし、退出するまでの一連の通知
    // given (前提条件):
    let server = TestServer::start().await;
    let mut x = server.connect().await;
    let mut y = server.connect().await;

    // when (操作): alice が入室
    join(&mut x, "R1", "alice").await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut x).await,
        json!({"type": "self-joined", "payload": {"roomId": "R1", "username": "alice"}})
    );
    assert_eq!(recv(&mut x).await, users(&["alice"]));
    assert_eq!(
        recv(&mut x).await,
        json!({"type": "chat-history", "payload": {"messages": []}})
    );

    // when (操作): bob が入室
    join(&mut y, "R1", "bob").await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut x).await,
        json!({"type": "joined", "payload": {"roomId": "R1", "username": "bob"}})
    );
    assert_eq!(recv(&mut x).await, users(&["alice", "bob"]));
    assert_eq!(
        recv(&mut y).await,
        json!({"type": "self-joined", "payload": {"roomId": "R1", "username": "bob"}})
    );
    assert_eq!(recv(&mut y).await, users(&["alice", "bob"]));
    assert_eq!(
        recv(&mut y).await,
        json!({"type": "chat-history", "payload": {"messages": []}})
    );

    // when (操作): alice が発言
    send(&mut x, json!({"type": "chat", "payload": {"message": "hi"}})).await;

    // then (期待する結果): bob だけが受け取る
    assert_eq!(
        recv(&mut y).await,
        json!({"type": "chat-new", "payload": {"from": "alice", "message": "hi"}})
    );
    assert_silent(&mut x).await;

    // when (操作): bob が退出
    send(&mut y, json!({"type": "exit", "payload": {}})).await;

    // then (期待する結果): ルームは alice が残っているので存続する
    assert_eq!(
        recv(&mut x).await,
        json!({"type": "left", "payload": {"roomId": "R1", "username": "bob"}})
    );
    assert_eq!(recv(&mut x).await, users(&["alice"]));
    let rooms = server.rooms().await;
    assert_eq!(rooms[0]["id"], "R1");
    assert_eq!(rooms[0]["users"], json!(["alice"]));
    assert_eq!(rooms[0]["messageCount"], 1);

    // when (操作): alice が退出
    send(&mut x, json!({"type": "exit", "payload": {"roomId": "R1"}})).await;

    // then (期待する結果): ルームが削除され、alice には何も届かない
    server.wait_for_rooms(|rooms| rooms == &json!([])).await;
    assert_silent(&mut x).await;
}

#[tokio::test]
async fn test_rejoin_after_room_deleted_has_empty_history() {
    // テスト項目: 全員が切断した後に同じルームへ入室すると履歴は空から始まる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut x = server.connect().await;
    join(&mut x, "R1", "alice").await;
    for _ in 0..3 {
        recv(&mut x).await;
    }
    send(&mut x, json!({"type": "chat", "payload": {"message": "hello"}})).await;
    x.close(None).await.unwrap();
    server.wait_for_rooms(|rooms| rooms == &json!([])).await;

    // when (操作):
    let mut y = server.connect().await;
    join(&mut y, "R1", "bob").await;

    // then (期待する結果):
    recv(&mut y).await;
    assert_eq!(recv(&mut y).await, users(&["bob"]));
    assert_eq!(
        recv(&mut y).await,
        json!({"type": "chat-history", "payload": {"messages": []}})
    );
}

#[tokio::test]
async fn test_late_joiner_receives_history() {
    // テスト項目: 後から入室したユーザーは既存の履歴を受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut x = server.connect().await;
    join(&mut x, "R1", "alice").await;
    for _ in 0..3 {
        recv(&mut x).await;
    }
    send(&mut x, json!({"type": "chat", "payload": {"message": "first"}})).await;
    send(&mut x, json!({"type": "chat", "payload": {"message": "second"}})).await;
    server
        .wait_for_rooms(|rooms| rooms[0]["messageCount"] == 2)
        .await;

    // when (操作):
    let mut y = server.connect().await;
    join(&mut y, "R1", "bob").await;

    // then (期待する結果):
    recv(&mut y).await;
    recv(&mut y).await;
    assert_eq!(
        recv(&mut y).await,
        json!({"type": "chat-history", "payload": {"messages": [
            {"from": "alice", "message": "first"},
            {"from": "alice", "message": "second"}
        ]}})
    );
    let detail: Value = reqwest::get(server.http_url("/api/rooms/R1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["users"], json!(["alice", "bob"]));
    assert_eq!(detail["messages"][1]["message"], "second");
}

#[tokio::test]
async fn test_chat_does_not_cross_rooms() {
    // テスト項目: 別ルームのメンバーにはチャットが届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut x = server.connect().await;
    let mut z = server.connect().await;
    join(&mut x, "R1", "alice").await;
    join(&mut z, "R2", "carol").await;
    for _ in 0..3 {
        recv(&mut x).await;
        recv(&mut z).await;
    }

    // when (操作):
    send(&mut x, json!({"type": "chat", "payload": {"message": "hi"}})).await;

    // then (期待する結果):
    assert_silent(&mut z).await;
}

#[tokio::test]
async fn test_chat_before_join_and_malformed_frames_are_ignored() {
    // テスト項目: 入室前のチャットや不正なフレームは無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut x = server.connect().await;

    // when (操作):
    send(&mut x, json!({"type": "chat", "payload": {"message": "early"}})).await;
    x.send(Message::Text("not json".to_string().into())).await.unwrap();
    send(&mut x, json!({"type": "shout", "payload": {}})).await;
    send(&mut x, json!({"type": "join", "payload": {"roomId": ""}})).await;

    // then (期待する結果):
    assert_silent(&mut x).await;
    assert_eq!(server.rooms().await, json!([]));

    join(&mut x, "R1", "alice").await;
    assert_eq!(
        recv(&mut x).await,
        json!({"type": "self-joined", "payload": {"roomId": "R1", "username": "alice"}})
    );
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_members() {
    // テスト項目: 接続が切れたメンバーについて left と users が残りのメンバーに届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut x = server.connect().await;
    let mut y = server.connect().await;
    join(&mut x, "R1", "alice").await;
    for _ in 0..3 {
        recv(&mut x).await;
    }
    join(&mut y, "R1", "bob").await;
    recv(&mut x).await;
    recv(&mut x).await;

    // when (操作):
    drop(y);

    // then (期待する結果):
    assert_eq!(
        recv(&mut x).await,
        json!({"type": "left", "payload": {"roomId": "R1", "username": "bob"}})
    );
    assert_eq!(recv(&mut x).await, users(&["alice"]));
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: /ping と /api/health が応答し、存在しない Room は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let _x = server.connect().await;

    // when (操作):
    let ping = reqwest::get(server.http_url("/ping")).await.unwrap();
    let status = ping.status();
    let body = ping.text().await.unwrap();
    let health: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let missing = reqwest::get(server.http_url("/api/rooms/nope")).await.unwrap();

    // then (期待する結果):
    assert_eq!(missing.status(), 404);
    assert_eq!(status, 200);
    assert_eq!(body, "pong");
    assert_eq!(health["status"], "ok");
    assert_eq!(health["rooms"], 0);
}

#[tokio::test]
async fn test_shutdown_closes_sessions_and_stops_engine() {
    // テスト項目: 参加中のクライアントがいてもシャットダウンでサーバーとエンジンが終了する
    // given (前提条件):
    let mut server = TestServer::start().await;
    let mut x = server.connect().await;
    join(&mut x, "R1", "alice").await;
    for _ in 0..3 {
        recv(&mut x).await;
    }

    // when (操作):
    server.trigger_shutdown();

    // then (期待する結果):
    tokio::time::timeout(RECV_TIMEOUT, &mut server.serve_task)
        .await
        .expect("server did not stop")
        .unwrap();
    tokio::time::timeout(RECV_TIMEOUT, &mut server.engine_task)
        .await
        .expect("presence engine did not stop")
        .unwrap();
    assert_eq!(server.repository.count_connections().await, 0);
    assert!(server.repository.list_rooms().await.is_empty());

    let frame = tokio::time::timeout(RECV_TIMEOUT, x.next())
        .await
        .expect("client was not closed");
    assert!(matches!(frame, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
}
