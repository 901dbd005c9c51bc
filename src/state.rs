//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::forward::Forwarder;
use crate::registry::DeviceRegistry;

/// State shared by the client and device routers.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
    /// Monotonic instant when the relay started (for uptime calculation).
    pub start_time: Instant,
    /// The one device table both APIs read and write.
    pub registry: DeviceRegistry,
    /// Outbound client used by `PUT /api/{device}/message`.
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(config: Config, registry: DeviceRegistry, forwarder: Forwarder) -> Self {
        Self {
            config: Arc::new(config),
            start_time: Instant::now(),
            registry,
            forwarder,
        }
    }
}
