//! HTTP error responses for the relay gateway.
//!
//! Every failure is answered with a JSON [`ErrorBody`] and the matching
//! status code.

use crate::room::RoomError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Gateway-level error pairing a status code with an [`ErrorBody`].
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl AppError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_owned(),
                message: message.into(),
            },
        }
    }

    pub fn validation(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::new(status, "VALIDATION_ERROR", detail)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<RoomError> for AppError {
    fn from(err: RoomError) -> Self {
        let message = err.to_string();
        match err {
            RoomError::NotFound => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
            RoomError::AlreadyClaimed => {
                Self::new(StatusCode::CONFLICT, "ALREADY_CLAIMED", message)
            }
            RoomError::AlreadyAttached => {
                Self::new(StatusCode::CONFLICT, "ALREADY_ATTACHED", message)
            }
            RoomError::IdSpaceExhausted => {
                tracing::error!("Room registry failure: {err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "ID_SPACE_EXHAUSTED", message)
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Malformed or schema-violating payloads are both plain bad requests.
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => rejection.status(),
        };
        Self::validation(status, rejection.body_text())
    }
}
