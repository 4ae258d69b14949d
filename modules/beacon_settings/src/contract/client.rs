//! Collaborator and client traits
//!
//! `DeviceConnection` and `CloudSettingsApi` are implemented outside this
//! crate (BLE transport, cloud HTTP client). `BeaconSettingsApi` is what
//! callers use; it is implemented by the native client.

use super::{error::{SettingError, TransportError}, model::{CharacteristicId, CloudDictionary}};
use crate::domain::DeviceSettings;
use async_trait::async_trait;
use bytes::Bytes;

/// Live connection to a beacon
///
/// The connection serialises access to a characteristic and owns any retry
/// or timeout policy. Errors are reported as-is to the caller.
#[async_trait]
pub trait DeviceConnection: Send + Sync {
    /// Read the raw payload of a characteristic
    async fn read_characteristic(&self, id: CharacteristicId) -> Result<Bytes, TransportError>;

    /// Write a raw payload to a characteristic
    async fn write_characteristic(
        &self,
        id: CharacteristicId,
        payload: Bytes,
    ) -> Result<(), TransportError>;
}

/// Cloud storage of device settings dictionaries
#[async_trait]
pub trait CloudSettingsApi: Send + Sync {
    /// Fetch the stored dictionary for a device, `None` if nothing is stored
    async fn fetch_settings(&self, device_id: &str) -> anyhow::Result<Option<CloudDictionary>>;

    /// Replace the stored dictionary for a device
    async fn save_settings(&self, device_id: &str, settings: CloudDictionary) -> anyhow::Result<()>;
}

/// Beacon settings API for in-process callers
#[async_trait]
pub trait BeaconSettingsApi: Send + Sync {
    // ===== Device Operations =====

    /// Read a full settings snapshot from the connected device
    async fn read_device_settings(&self) -> Result<DeviceSettings, SettingError>;

    /// Write every setting present in the snapshot to the connected device
    async fn write_device_settings(&self, settings: &DeviceSettings) -> Result<usize, SettingError>;

    // ===== Cloud Operations =====

    /// Fetch the snapshot stored in the cloud for a device
    async fn fetch_cloud_settings(&self, device_id: &str) -> Result<DeviceSettings, SettingError>;

    /// Merge an update over the stored snapshot and persist the result
    async fn push_cloud_settings(
        &self,
        device_id: &str,
        update: &DeviceSettings,
    ) -> Result<DeviceSettings, SettingError>;

    // ===== Sync Operations =====

    /// Read the device and persist its settings to the cloud
    async fn sync_device_to_cloud(&self, device_id: &str) -> Result<DeviceSettings, SettingError>;

    /// Apply the snapshot stored in the cloud to the device
    async fn apply_cloud_settings(&self, device_id: &str) -> Result<usize, SettingError>;
}
