//! Room-based chat relay server.
//!
//! Clients connect over WebSocket, join a room by id, and chat with everyone
//! in that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! PORT=3000 cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 127.0.0.1 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    config::{DEFAULT_HOST, ServerConfig},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{EngineUseCases, PresenceEngine, Server},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRoomsUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, SendChatUseCase,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to (defaults to $PORT, then 8080)
    #[arg(short = 'p', long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig::from_env(args.host, args.port);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. PresenceEngine
    // 5. Server

    // 1. Create Repository (in-memory Connection Registry + Room Directory)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let clock = Arc::new(SystemClock);
    let usecases = EngineUseCases {
        connect_client: Arc::new(ConnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        join_room: Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        send_chat: Arc::new(SendChatUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock,
        )),
        leave_room: Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        disconnect_client: Arc::new(DisconnectClientUseCase::new(
            repository.clone(),
            message_pusher,
        )),
    };
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository));

    // 4. Start the PresenceEngine (single owner of all room state changes)
    let (engine, engine_handle) = PresenceEngine::new(usecases);
    let engine_task = tokio::spawn(engine.run());

    // 5. Create and run the server
    let server = Server::new(engine_handle, get_rooms_usecase);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // Each closed session has queued its disconnect; the engine stops after
    // processing them and dropping the last handle
    if let Err(e) = engine_task.await {
        tracing::error!("Presence engine task failed: {}", e);
    }
}
