//! Device-facing endpoint.
//!
//! `PUT /api/{device_id}` — a device pushes its latest message. The relay
//! records the TCP peer's IP as the device's address, so the location can't be
//! spoofed through the body or headers.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
};
use tracing::info;

use crate::error::RelayError;
use crate::extract::{DeviceId, MessageBody};
use crate::AppState;

/// `PUT /api/{device_id}` — record the caller's address and message.
///
/// # Errors
///
/// - `400 Bad Request` — body missing, malformed, or `msg` empty
/// - `404 Not Found` — unknown device id
/// - `500 Internal Server Error` — route matched without a device id
pub async fn report(
    State(state): State<AppState>,
    DeviceId(device_id): DeviceId,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    MessageBody(body): MessageBody,
) -> Result<StatusCode, RelayError> {
    // IPv4 peers on a dual-stack listener arrive as ::ffff:a.b.c.d
    let address = peer.ip().to_canonical().to_string();
    state
        .registry
        .update_location_and_message(&device_id, &address, &body.msg)
        .await
        .map_err(RelayError::from)?;

    info!(device_id = %device_id, address = %address, "Device reported");
    Ok(StatusCode::OK)
}
