use crate::room::RoomError;
use crate::transport::{ConnectionId, HostLink};
use rendezvous_core::SignalPayload;
use tokio::sync::oneshot;

pub(crate) type Reply = oneshot::Sender<Result<(), RoomError>>;

/// Mutations routed to a room's event loop by the registry.
pub(crate) enum RoomCommand {
    /// Would an attach succeed right now?
    ProbeAttach { reply: Reply },

    /// The publisher's persistent connection finished its handshake.
    Attach {
        link: Box<dyn HostLink>,
        reply: Reply,
    },

    /// The publisher's connection went away before anything was delivered.
    Detach { connection_id: ConnectionId },

    /// A joiner submitted its answer.
    Claim { payload: SignalPayload, reply: Reply },
}
