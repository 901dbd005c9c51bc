//! HTTP route handlers and the two routers they are mounted on.
//!
//! The client and device APIs listen on separate ports but share one
//! [`AppState`], and therefore one registry.

pub mod client;
pub mod device;
pub mod health;

use axum::{
    routing::{get, put},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Which API a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Client,
    Device,
}

impl Surface {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Device => "device",
        }
    }
}

/// Client API: list devices, send a message to one.
pub fn client_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/devices", get(client::list_devices))
        .route("/api/{device}/message", put(client::send_message))
        .layer(Extension(Surface::Client))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Device API: self-report. Needs to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn device_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/{device_id}", put(device::report))
        .layer(Extension(Surface::Device))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
