mod envelope;
mod room;
mod signaling;

pub use envelope::{RoomTicket, SignalEnvelope};
pub use room::RoomId;
pub use signaling::{IceCandidate, SdpType, SignalPayload};
