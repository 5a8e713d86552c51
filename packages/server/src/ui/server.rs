//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, usecase::GetRoomsUseCase};

use super::{
    engine::EngineHandle,
    handler::{get_room_detail, get_rooms, health_check, ping, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Room chat relay server
///
/// # Example
///
/// ```ignore
/// let (engine, handle) = PresenceEngine::new(usecases);
/// tokio::spawn(engine.run());
/// let server = Server::new(handle, get_rooms_usecase);
/// server.run(&ServerConfig::default()).await?;
/// ```
pub struct Server {
    /// Handle to the running presence engine
    engine: EngineHandle,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
}

impl Server {
    pub fn new(engine: EngineHandle, get_rooms_usecase: Arc<GetRoomsUseCase>) -> Self {
        Self {
            engine,
            get_rooms_usecase,
        }
    }

    /// Build the axum router. Open WebSocket sessions close once `shutdown`
    /// turns `true`.
    pub fn router(self, shutdown: watch::Receiver<bool>) -> Router {
        let app_state = Arc::new(AppState {
            engine: self.engine,
            get_rooms_usecase: self.get_rooms_usecase,
            shutdown,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/", get(websocket_handler))
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/ping", get(ping))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(config.bind_addr()).await?;

        tracing::info!(
            "Chat relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", config.bind_addr());
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// When `shutdown` resolves, every WebSocket session is closed and queues
    /// its disconnect, so the presence engine stops once it has drained them.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let signal = async move {
            shutdown.await;
            shutdown_tx.send_replace(true);
        };

        axum::serve(listener, self.router(shutdown_rx))
            .with_graceful_shutdown(signal)
            .await
    }
}
