use crate::error::AppError;
use crate::room::RoomRegistry;
use crate::transport::{HostLink, WsHostLink};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use rendezvous_core::RoomId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// `GET /{room_id}` with an upgrade: the publisher's persistent connection.
///
/// The handshake is refused outright when the room is unknown or already has
/// a connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(registry): State<RoomRegistry>,
) -> Response {
    let room_id = RoomId::from(room_id);

    if let Err(e) = registry.probe_attach(&room_id).await {
        warn!("Refusing connection for room {}: {}", room_id, e);
        return AppError::from(e).into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(socket, room_id, registry))
}

async fn handle_socket(socket: WebSocket, room_id: RoomId, registry: RoomRegistry) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let link = WsHostLink::new(tx);
    let connection_id = link.connection_id();
    info!("New publisher connection {} for room {}", connection_id, room_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    if let Err(e) = registry.attach_connection(&room_id, Box::new(link)).await {
        // Lost a race with another upgrade, or the room ended mid-handshake.
        warn!(
            "Dropping connection {} for room {}: {}",
            connection_id, room_id, e
        );
        send_task.abort();
        return;
    }

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                other => debug!("Ignoring publisher message {:?}", other),
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    registry.detach_connection(&room_id, connection_id).await;
    info!("Publisher connection {} closed", connection_id);
}
