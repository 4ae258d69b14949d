//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{BeaconSettingsApi, SettingError};
use crate::domain::{DeviceSettings, Service};
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BeaconSettingsApi for NativeClient {
    async fn read_device_settings(&self) -> Result<DeviceSettings, SettingError> {
        self.service.read_device_settings().await
    }

    async fn write_device_settings(&self, settings: &DeviceSettings) -> Result<usize, SettingError> {
        self.service.write_device_settings(settings).await
    }

    async fn fetch_cloud_settings(&self, device_id: &str) -> Result<DeviceSettings, SettingError> {
        self.service.fetch_cloud_settings(device_id).await
    }

    async fn push_cloud_settings(
        &self,
        device_id: &str,
        update: &DeviceSettings,
    ) -> Result<DeviceSettings, SettingError> {
        self.service.push_cloud_settings(device_id, update).await
    }

    async fn sync_device_to_cloud(&self, device_id: &str) -> Result<DeviceSettings, SettingError> {
        self.service.sync_device_to_cloud(device_id).await
    }

    async fn apply_cloud_settings(&self, device_id: &str) -> Result<usize, SettingError> {
        self.service.apply_cloud_settings(device_id).await
    }
}
