use crate::model::room::RoomId;
use crate::model::signaling::SignalPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper used on the wire for every request and peek response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEnvelope {
    pub signal: SignalPayload,
}

/// Returned to the publisher when a room is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomTicket {
    pub id: RoomId,
    pub expires_at: DateTime<Utc>,
}
