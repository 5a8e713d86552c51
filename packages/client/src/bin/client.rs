//! WebSocket chat client for Hiroba rooms.
//!
//! Connects to a Hiroba server, joins the given room and sends every line typed
//! at the prompt as a chat message. Reconnects automatically when the
//! connection drops (max 5 attempts with 5 second interval) and rejoins the
//! room it was in.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --room R1 --username alice
//! cargo run --bin hiroba-client -- -r R1 -n bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "WebSocket chat client for room-based chat", long_about = None)]
struct Args {
    /// Room to join on connect
    #[arg(short = 'r', long)]
    room: String,

    /// Display name shown to other members (not required to be unique)
    #[arg(short = 'n', long)]
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = hiroba_client::run_client(args.url, args.room, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
