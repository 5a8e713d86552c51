//! Domain layer: value objects, entities, events and the ports implemented by
//! the infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, JoinedRoom, LeftRoom, Membership, PostedMessage, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{ClientEvent, ServerEvent};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, MessageText, RoomId, Timestamp, Username};

#[cfg(test)]
pub use pusher::MockMessagePusher;
