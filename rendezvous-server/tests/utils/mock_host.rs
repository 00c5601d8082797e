use async_trait::async_trait;
use rendezvous_core::SignalPayload;
use rendezvous_server::{ConnectionId, HostLink};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Delivered(SignalPayload),
    Closed,
}

/// Mock HostLink that captures everything a room pushes to the publisher.
#[derive(Clone)]
pub struct MockHostLink {
    id: ConnectionId,
    /// Channel to send captured events.
    tx: mpsc::UnboundedSender<HostEvent>,
    /// All captured events (for verification).
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl MockHostLink {
    /// Create a new MockHostLink and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let link = Self {
            id: ConnectionId::new(),
            tx,
            events: Arc::new(Mutex::new(Vec::new())),
        };
        (link, rx)
    }

    pub fn boxed(&self) -> Box<dyn HostLink> {
        Box::new(self.clone())
    }

    pub async fn delivered(&self) -> Vec<SignalPayload> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                HostEvent::Delivered(payload) => Some(payload.clone()),
                HostEvent::Closed => None,
            })
            .collect()
    }

    pub async fn close_count(&self) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| matches!(e, HostEvent::Closed))
            .count()
    }
}

#[async_trait]
impl HostLink for MockHostLink {
    fn connection_id(&self) -> ConnectionId {
        self.id
    }

    async fn deliver(&self, payload: SignalPayload) {
        tracing::debug!("[MockHost] deliver on {}", self.id);

        let event = HostEvent::Delivered(payload);
        self.events.lock().await.push(event.clone());
        let _ = self.tx.send(event);
    }

    async fn close(&self) {
        tracing::debug!("[MockHost] close on {}", self.id);

        self.events.lock().await.push(HostEvent::Closed);
        let _ = self.tx.send(HostEvent::Closed);
    }
}
