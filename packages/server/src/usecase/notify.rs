//! Best-effort delivery helpers shared by the usecases.
//!
//! Push failures never abort a usecase: the state change has already happened
//! and a closed peer simply misses the event.

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, ServerEvent};

pub(super) async fn push(
    pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    event: &ServerEvent,
) {
    match pusher.push_to(connection_id, event).await {
        Ok(()) => {}
        Err(MessagePushError::ChannelClosed(_)) => {
            tracing::debug!(
                "Skipped '{}' for closed client '{}'",
                event.kind(),
                connection_id
            );
        }
        Err(e) => {
            tracing::warn!("Failed to push '{}': {}", event.kind(), e);
        }
    }
}

pub(super) async fn broadcast(
    pusher: &dyn MessagePusher,
    targets: Vec<ConnectionId>,
    event: &ServerEvent,
) {
    if let Err(e) = pusher.broadcast(targets, event).await {
        tracing::warn!("Failed to broadcast '{}': {}", event.kind(), e);
    }
}
