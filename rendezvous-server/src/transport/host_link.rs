use async_trait::async_trait;
use rendezvous_core::SignalPayload;
use std::fmt;
use uuid::Uuid;

/// Identifies one publisher connection, so a late close of an old socket
/// cannot detach a newer one.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound half of the publisher's persistent connection, as seen by a room.
///
/// Implementations must not block: both methods are called from the room's
/// event loop after it has already been taken out of the registry.
#[async_trait]
pub trait HostLink: Send + Sync {
    fn connection_id(&self) -> ConnectionId;

    /// Push the joiner's payload to the publisher.
    async fn deliver(&self, payload: SignalPayload);

    /// Close the connection. Closing twice is a no-op.
    async fn close(&self);
}
