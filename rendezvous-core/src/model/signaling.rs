use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Session description kind carried by a signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Pranswer,
    Answer,
    Rollback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    /// Kept as the submitted JSON number so it is relayed unchanged.
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: Number,
    pub sdp_mid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Opaque offer/answer message exchanged between the two peers.
///
/// Only the fields below are checked when a payload is deserialized. Any
/// other property is kept in `extra` and relayed untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalPayload {
    #[serde(rename = "type")]
    pub kind: SdpType,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub sdp: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub candidate: Option<IceCandidate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SignalPayload {
    pub fn new(kind: SdpType, sdp: impl Into<String>) -> Self {
        Self {
            kind,
            sdp: Some(sdp.into()),
            candidate: None,
            extra: Map::new(),
        }
    }
}

/// Optional field that may be absent but never `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
