//! In-memory device registry.
//!
//! The set of device ids is fixed when the registry is built. At runtime only
//! a record's `address` and `last_message` change, and always together under
//! a single write guard so readers never see one without the other.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::RegistryError;

/// Ids that a fixed route would shadow (`GET /api/health` on the device API).
pub const RESERVED_IDS: &[&str] = &["health"];

/// One known device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub id: String,
    pub name: String,
    pub comment: String,
    /// Last observed host/IP (optionally `host:port`).
    pub address: String,
    /// Most recent message the device pushed. Empty until the first one.
    pub last_message: String,
}

/// Provisioning entry used to seed the registry, typically from `[[devices]]`
/// in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSeed {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub address: String,
}

impl DeviceSeed {
    pub fn new(id: &str, name: &str, comment: &str, address: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            comment: comment.to_string(),
            address: address.to_string(),
        }
    }
}

impl From<DeviceSeed> for DeviceRecord {
    fn from(seed: DeviceSeed) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            comment: seed.comment,
            address: seed.address,
            last_message: String::new(),
        }
    }
}

/// Shared handle to the device table. Cloning is cheap and every clone sees
/// the same records.
#[derive(Clone, Debug)]
pub struct DeviceRegistry {
    devices: Arc<RwLock<Vec<DeviceRecord>>>,
}

impl DeviceRegistry {
    /// Build a registry from provisioning entries, preserving their order.
    ///
    /// Fails on an empty id, a [`RESERVED_IDS`] entry, or when two entries
    /// share an id.
    pub fn new(seeds: impl IntoIterator<Item = DeviceSeed>) -> Result<Self, RegistryError> {
        let mut devices: Vec<DeviceRecord> = Vec::new();
        for seed in seeds {
            if seed.id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if RESERVED_IDS.contains(&seed.id.as_str()) {
                return Err(RegistryError::ReservedId(seed.id));
            }
            if devices.iter().any(|d| d.id == seed.id) {
                return Err(RegistryError::DuplicateId(seed.id));
            }
            devices.push(seed.into());
        }
        Ok(Self {
            devices: Arc::new(RwLock::new(devices)),
        })
    }

    /// Look up a device by id. Returns a copy; the read lock is released on return.
    pub async fn find_by_id(&self, id: &str) -> Option<DeviceRecord> {
        let devices = self.devices.read().await;
        devices.iter().find(|d| d.id == id).cloned()
    }

    /// Record a device's newly observed address together with its message.
    pub async fn update_location_and_message(
        &self,
        id: &str,
        address: &str,
        message: &str,
    ) -> Result<(), RegistryError> {
        let mut devices = self.devices.write().await;
        let device = devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        device.address = address.to_string();
        device.last_message = message.to_string();
        Ok(())
    }

    /// Copy of every record in provisioning order.
    pub async fn snapshot(&self) -> Vec<DeviceRecord> {
        self.devices.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }
}
