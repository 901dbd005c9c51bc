#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

//! # devrelay
//!
//! Relay that delivers client messages to devices whose network address
//! changes over time. Devices call in to report; the relay remembers where
//! each call came from and forwards client messages there.
//!
//! ## API surface
//!
//! Device API (default `0.0.0.0:3001`):
//!
//! | Method | Path               | Description                                   |
//! |--------|--------------------|-----------------------------------------------|
//! | GET    | `/api/health`      | Liveness probe                                |
//! | PUT    | `/api/{device_id}` | Device self-report `{"msg"}`; records peer IP |
//!
//! Client API (default `0.0.0.0:3000`):
//!
//! | Method | Path                     | Description                          |
//! |--------|--------------------------|--------------------------------------|
//! | GET    | `/api/health`            | Liveness probe                       |
//! | GET    | `/api/devices`           | Snapshot of all devices              |
//! | PUT    | `/api/{device}/message`  | Forward `{"msg"}` to the device      |
//!
//! ## Architecture
//!
//! ```text
//! main.rs          — entry point, clap subcommands, tracing setup
//! supervisor.rs    — runs both servers, shared shutdown
//! config.rs        — TOML + env-var configuration
//! registry.rs      — DeviceRegistry (the shared device table)
//! forward.rs       — Forwarder (relay → device PUT)
//! message.rs       — wire types
//! extract.rs       — path/body extractors with relay rejections
//! error.rs         — error taxonomy and HTTP status mapping
//! routes/
//!   client.rs      — GET /api/devices, PUT /api/{device}/message
//!   device.rs      — PUT /api/{device_id}
//!   health.rs      — GET /api/health
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod forward;
pub mod message;
pub mod registry;
pub mod routes;
pub mod state;
pub mod supervisor;

pub use config::Config;
pub use error::RelayError;
pub use forward::Forwarder;
pub use registry::{DeviceRecord, DeviceRegistry};
pub use state::AppState;
