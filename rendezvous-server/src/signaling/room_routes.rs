use crate::error::AppError;
use crate::room::RoomRegistry;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use rendezvous_core::{RoomId, RoomTicket, SignalEnvelope};

/// `POST /peer`: open a room for the publisher's offer.
pub async fn publish(
    State(registry): State<RoomRegistry>,
    body: Result<Json<SignalEnvelope>, JsonRejection>,
) -> Result<Json<RoomTicket>, AppError> {
    let Json(envelope) = body?;
    let ticket = registry.create(envelope.signal)?;
    Ok(Json(ticket))
}

/// `GET /join/{room_id}`: show the publisher's offer to a prospective joiner.
pub async fn peek(
    State(registry): State<RoomRegistry>,
    Path(room_id): Path<String>,
) -> Result<Json<SignalEnvelope>, AppError> {
    let signal = registry.lookup(&RoomId::from(room_id))?;
    Ok(Json(SignalEnvelope { signal }))
}

/// `POST /join/{room_id}`: hand the joiner's answer to the room.
///
/// An unknown room is reported before the body is looked at.
pub async fn join(
    State(registry): State<RoomRegistry>,
    Path(room_id): Path<String>,
    body: Result<Json<SignalEnvelope>, JsonRejection>,
) -> Result<Json<bool>, AppError> {
    let room_id = RoomId::from(room_id);
    registry.lookup(&room_id)?;

    let Json(envelope) = body?;
    registry.claim(&room_id, envelope.signal).await?;
    Ok(Json(true))
}

pub async fn health() -> &'static str {
    "OK"
}
