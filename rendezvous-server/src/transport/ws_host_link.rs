use crate::transport::{ConnectionId, HostLink};
use async_trait::async_trait;
use axum::extract::ws::Message;
use rendezvous_core::SignalPayload;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// [`HostLink`] backed by the send queue of an upgraded WebSocket.
pub struct WsHostLink {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Message>,
}

impl WsHostLink {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: ConnectionId::new(),
            tx,
        }
    }
}

#[async_trait]
impl HostLink for WsHostLink {
    fn connection_id(&self) -> ConnectionId {
        self.id
    }

    async fn deliver(&self, payload: SignalPayload) {
        match serde_json::to_string(&payload) {
            Ok(json) => {
                if let Err(e) = self.tx.send(Message::Text(json.into())) {
                    error!("Failed to queue answer for connection {}: {:?}", self.id, e);
                }
            }
            Err(e) => error!("Failed to serialize signal payload: {}", e),
        }
    }

    async fn close(&self) {
        if self.tx.send(Message::Close(None)).is_err() {
            debug!("Connection {} already closed", self.id);
        }
    }
}
