//! Client-facing endpoints.
//!
//! - `GET /api/devices` — snapshot of every known device
//! - `PUT /api/{device}/message` — forward a message to a device's last-known address

use axum::{extract::State, Json};
use tracing::info;

use crate::error::RelayError;
use crate::extract::{DeviceId, MessageBody};
use crate::message::{DeviceList, DeviceView, MessagePayload};
use crate::AppState;

/// `GET /api/devices` — list every device. Never fails.
pub async fn list_devices(State(state): State<AppState>) -> Json<DeviceList> {
    let expose_address = state.config.client_api.expose_address;
    let devices = state
        .registry
        .snapshot()
        .await
        .into_iter()
        .map(|record| DeviceView::from_record(record, expose_address))
        .collect();
    Json(DeviceList { devices })
}

/// `PUT /api/{device}/message` — relay a message to the device and echo it back.
///
/// The registry is only read; the device's next self-report is what updates
/// its stored message.
///
/// # Errors
///
/// - `400 Bad Request` — invalid body, or the device couldn't be reached or
///   didn't answer 200 (causes are logged, not returned)
/// - `404 Not Found` — unknown device id; nothing is sent
/// - `500 Internal Server Error` — route matched without a device id
pub async fn send_message(
    State(state): State<AppState>,
    DeviceId(device_id): DeviceId,
    MessageBody(body): MessageBody,
) -> Result<Json<MessagePayload>, RelayError> {
    // The returned record is a copy: no registry lock is held across the forward.
    let device = state
        .registry
        .find_by_id(&device_id)
        .await
        .ok_or_else(|| RelayError::NotFound(device_id.clone()))?;

    state.forwarder.forward(&device.address, &body).await?;

    info!(device_id = %device_id, address = %device.address, "Message forwarded");
    Ok(Json(body))
}
