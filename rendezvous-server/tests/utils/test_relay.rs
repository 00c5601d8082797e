use anyhow::{Context, Result};
use futures::StreamExt;
use rendezvous_core::{RoomId, RoomTicket, SignalEnvelope, SignalPayload};
use rendezvous_server::{RegistryConfig, RelayConfig, RelayServer, RoomError, RoomRegistry};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::signal_helpers::EVENT_TIMEOUT_MS;

pub type HostSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A relay served on an ephemeral local port.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub registry: RoomRegistry,
    http: reqwest::Client,
}

impl TestRelay {
    pub async fn spawn(registry: RegistryConfig) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let config = RelayConfig {
            listen_addr: addr,
            registry,
            ..RelayConfig::default()
        };
        let server = RelayServer::new(config)?;
        let registry = server.registry().clone();

        tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                tracing::error!("Test relay stopped: {}", e);
            }
        });

        Ok(Self {
            addr,
            registry,
            http: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, id: &RoomId) -> String {
        format!("ws://{}/{}", self.addr, id)
    }

    pub async fn publish(&self, payload: &SignalPayload) -> Result<RoomTicket> {
        let response = self.post_signal("/peer", payload).await?;
        anyhow::ensure!(
            response.status() == reqwest::StatusCode::OK,
            "Publish failed with {}",
            response.status()
        );
        response.json().await.context("Invalid publish response")
    }

    pub async fn peek(&self, id: &RoomId) -> Result<reqwest::Response> {
        self.http
            .get(self.url(&format!("/join/{}", id)))
            .send()
            .await
            .context("Peek request failed")
    }

    pub async fn join(&self, id: &RoomId, payload: &SignalPayload) -> Result<reqwest::Response> {
        self.post_signal(&format!("/join/{}", id), payload).await
    }

    pub async fn post_signal(
        &self,
        path: &str,
        payload: &SignalPayload,
    ) -> Result<reqwest::Response> {
        let envelope = SignalEnvelope {
            signal: payload.clone(),
        };
        self.http
            .post(self.url(path))
            .json(&envelope)
            .send()
            .await
            .context("POST request failed")
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> Result<reqwest::Response> {
        self.http
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .context("POST request failed")
    }

    pub async fn connect_host(&self, id: &RoomId) -> Result<HostSocket, tungstenite::Error> {
        let (socket, _) = tokio_tungstenite::connect_async(self.ws_url(id)).await?;
        Ok(socket)
    }

    /// Wait until the registry reports a publisher connection on `id`.
    pub async fn wait_attached(&self, id: &RoomId) -> Result<()> {
        self.wait_for_probe(id, Err(RoomError::AlreadyAttached)).await
    }

    /// Wait until the registry would accept a new publisher connection on `id`.
    pub async fn wait_detached(&self, id: &RoomId) -> Result<()> {
        self.wait_for_probe(id, Ok(())).await
    }

    async fn wait_for_probe(&self, id: &RoomId, expected: Result<(), RoomError>) -> Result<()> {
        let start = std::time::Instant::now();
        while self.registry.probe_attach(id).await != expected {
            if start.elapsed() > Duration::from_millis(EVENT_TIMEOUT_MS) {
                anyhow::bail!("Timeout waiting for room {} to reach {:?}", id, expected);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }
}

/// Status code of a refused WebSocket handshake.
pub fn refused_status(err: &tungstenite::Error) -> Option<u16> {
    match err {
        tungstenite::Error::Http(response) => Some(response.status().as_u16()),
        _ => None,
    }
}

/// Read the single payload the relay pushes, then require the socket to end.
pub async fn receive_answer(socket: &mut HostSocket) -> Result<SignalPayload> {
    let timeout = Duration::from_millis(EVENT_TIMEOUT_MS);

    let payload = loop {
        let msg = tokio::time::timeout(timeout, socket.next())
            .await
            .context("Timeout waiting for answer")?
            .context("Socket ended before the answer")??;
        match msg {
            Message::Text(text) => break serde_json::from_str(text.as_str())?,
            Message::Ping(_) | Message::Pong(_) => continue,
            other => anyhow::bail!("Unexpected frame before the answer: {:?}", other),
        }
    };

    expect_closed(socket).await?;
    Ok(payload)
}

/// Require that no further payload arrives and the relay closes the socket.
pub async fn expect_closed(socket: &mut HostSocket) -> Result<()> {
    let timeout = Duration::from_millis(EVENT_TIMEOUT_MS);

    loop {
        let next = tokio::time::timeout(timeout, socket.next())
            .await
            .context("Timeout waiting for the relay to close the socket")?;
        match next {
            None | Some(Ok(Message::Close(_))) | Some(Err(_)) => return Ok(()),
            Some(Ok(Message::Text(text))) => {
                anyhow::bail!("Relay sent a second message: {}", text.as_str())
            }
            Some(Ok(_)) => continue,
        }
    }
}
