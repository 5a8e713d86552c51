//! UseCase 層
//!
//! 各ユースケースは Repository と MessagePusher（ドメイン層の trait）にのみ依存します。
//! 1 つのユースケースは 1 つのクライアントイベントの処理全体（状態変更と通知）を担当します。

mod connect_client;
mod error;
mod get_rooms;
mod join_room;
mod leave_room;
mod notify;
mod send_chat;

pub use connect_client::ConnectClientUseCase;
pub use error::{ConnectError, JoinError, LeaveError, SendChatError};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::{DisconnectClientUseCase, LeaveRoomUseCase};
pub use send_chat::SendChatUseCase;
