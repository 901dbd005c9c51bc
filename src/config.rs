//! Configuration loading and defaults.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Environment variables** — `DEVRELAY_CLIENT_LISTEN`,
//!    `DEVRELAY_DEVICE_LISTEN`, `DEVRELAY_FORWARD_TIMEOUT_MS`
//! 2. **Config file** — path via `--config <path>`, or `devrelay.toml` in CWD
//! 3. **Compiled defaults** — see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [client_api]
//! listen = "0.0.0.0:3000"
//! expose_address = true
//!
//! [device_api]
//! listen = "0.0.0.0:3001"
//!
//! [forward]
//! path = "/message"
//! device_port = 8080          # optional, appended when the address has no port
//! connect_timeout_ms = 5000
//! timeout_ms = 10000
//!
//! [logging]
//! level = "info"
//!
//! # Omit entirely to use the three built-in demo devices,
//! # or set `devices = []` (before any table) for none
//! [[devices]]
//! id = "smartscreen-1"
//! name = "UDLAP DEVICE"
//! comment = "demo device used in lesson"
//! address = "192.168.80.103"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::registry::DeviceSeed;

const DEFAULT_CONFIG_FILE: &str = "devrelay.toml";

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client_api: ClientApiConfig,
    #[serde(default)]
    pub device_api: DeviceApiConfig,
    #[serde(default)]
    pub forward: ForwardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provisioned devices. Omitted means "use the built-in seed set";
    /// an explicit `devices = []` means none.
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceSeed>,
}

/// Client-facing HTTP surface.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientApiConfig {
    /// Socket address to bind (default `0.0.0.0:3000`).
    #[serde(default = "default_client_listen")]
    pub listen: String,
    /// Include each device's address (`Ip`) in `GET /api/devices` (default true).
    #[serde(default = "default_expose_address")]
    pub expose_address: bool,
}

/// Device-facing HTTP surface.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceApiConfig {
    /// Socket address to bind (default `0.0.0.0:3001`).
    #[serde(default = "default_device_listen")]
    pub listen: String,
}

/// Outbound relay → device call.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardConfig {
    /// Path on the device that receives forwarded messages (default `/message`).
    #[serde(default = "default_forward_path")]
    pub path: String,
    /// Port appended to addresses that don't carry one. `None` means plain
    /// `http://{address}` (port 80).
    pub device_port: Option<u16>,
    /// TCP connect timeout in milliseconds (default 5 000).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds (default 10 000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `info`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_client_listen() -> String {
    "0.0.0.0:3000".to_string()
}
fn default_device_listen() -> String {
    "0.0.0.0:3001".to_string()
}
fn default_expose_address() -> bool {
    true
}
fn default_forward_path() -> String {
    "/message".to_string()
}
fn default_connect_timeout_ms() -> u64 {
    5000
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_log_level() -> String {
    "info".to_string()
}

/// The demo devices provisioned when the config names none.
pub fn default_devices() -> Vec<DeviceSeed> {
    vec![
        DeviceSeed::new(
            "smartscreen-1",
            "UDLAP DEVICE",
            "demo device used in lesson",
            "192.168.80.103",
        ),
        DeviceSeed::new(
            "smartscreen-2",
            "SOME OTHER DEVICE",
            "a second device",
            "172.168.10.1",
        ),
        DeviceSeed::new(
            "smartscreen-3",
            "ANOTHER DEVICE",
            "a third device",
            "172.168.10.24",
        ),
    ]
}

impl Default for ClientApiConfig {
    fn default() -> Self {
        Self {
            listen: default_client_listen(),
            expose_address: default_expose_address(),
        }
    }
}

impl Default for DeviceApiConfig {
    fn default() -> Self {
        Self {
            listen: default_device_listen(),
        }
    }
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            path: default_forward_path(),
            device_port: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_api: ClientApiConfig::default(),
            device_api: DeviceApiConfig::default(),
            forward: ForwardConfig::default(),
            logging: LoggingConfig::default(),
            devices: default_devices(),
        }
    }
}

impl Config {
    /// Load configuration with the precedence chain: env vars > file > defaults.
    ///
    /// If `path` is `Some`, that file must exist. Otherwise `devrelay.toml` in
    /// the current directory is used when present, falling back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Parse a TOML document. A document without a `devices` key gets the
    /// demo seeds.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values that would make every forward fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forward.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "forward.timeout_ms",
                reason: "must be greater than zero",
            });
        }
        if self.forward.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "forward.connect_timeout_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(listen) = lookup("DEVRELAY_CLIENT_LISTEN") {
            self.client_api.listen = listen;
        }
        if let Some(listen) = lookup("DEVRELAY_DEVICE_LISTEN") {
            self.device_api.listen = listen;
        }
        if let Some(raw) = lookup("DEVRELAY_FORWARD_TIMEOUT_MS") {
            self.forward.timeout_ms = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "DEVRELAY_FORWARD_TIMEOUT_MS",
                value: raw,
            })?;
        }
        Ok(())
    }
}
