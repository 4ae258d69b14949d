//! Module declaration and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::{BeaconSettingsApi, CloudSettingsApi, DeviceConnection};
use crate::domain::Service;
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Beacon settings module
///
/// Owns the configuration and the domain service built from the device
/// connection and cloud store handed to [`BeaconSettingsModule::init`].
pub struct BeaconSettingsModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for BeaconSettingsModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl BeaconSettingsModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the domain service and return the in-process client
    ///
    /// Calling `init` again replaces the service; clients handed out
    /// earlier keep using the previous one.
    pub fn init(
        &self,
        config: Config,
        connection: Arc<dyn DeviceConnection>,
        cloud: Arc<dyn CloudSettingsApi>,
    ) -> Result<Arc<dyn BeaconSettingsApi>> {
        config.validate()?;
        *self.config.write() = config.clone();

        let service = Arc::new(Service::new(connection, cloud, config));
        *self.service.write() = Some(service.clone());

        tracing::info!(
            packets = self.config.read().packets.len(),
            max_slots_per_packet = self.config.read().max_slots_per_packet,
            "Beacon settings module initialized"
        );
        Ok(Arc::new(NativeClient::new(service)))
    }

    /// Client for the initialized service
    pub fn client(&self) -> Result<Arc<dyn BeaconSettingsApi>> {
        let service = self
            .service
            .read()
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?
            .clone();
        Ok(Arc::new(NativeClient::new(service)))
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }
}
