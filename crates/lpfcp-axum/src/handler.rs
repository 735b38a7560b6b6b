//! Request handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use lpfcp::{Dispatch, ProtocolConfig};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok", "protocol": ProtocolConfig::PROTOCOL_NAME}))
}

/// Hand the body to the processor and answer with its envelope.
///
/// The envelope is always returned with 200, including failure envelopes.
pub async fn handle_call(
    State(dispatcher): State<Arc<dyn Dispatch>>,
    body: Bytes,
) -> Response {
    let envelope = match tokio::task::spawn_blocking(move || dispatcher.dispatch(&body)).await {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Dispatch task failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match envelope.to_vec() {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, ProtocolConfig::CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize envelope: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
