//! Domain service - device and cloud orchestration

use super::aggregate::DeviceSettings;
use super::groups::{GeneralSettings, SettingsGroup};
use crate::config::Config;
use crate::contract::{
    CloudDictionary, CloudSettingsApi, DeviceConnection, PacketKind, SettingError,
};
use std::sync::Arc;

/// Domain service for beacon settings
pub struct Service {
    connection: Arc<dyn DeviceConnection>,
    cloud: Arc<dyn CloudSettingsApi>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        connection: Arc<dyn DeviceConnection>,
        cloud: Arc<dyn CloudSettingsApi>,
        config: Config,
    ) -> Self {
        Self {
            connection,
            cloud,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Device Operations =====

    /// Read general settings and every configured packet kind from the device
    pub async fn read_device_settings(&self) -> Result<DeviceSettings, SettingError> {
        let connection = self.connection.as_ref();
        let mut settings = DeviceSettings {
            general: GeneralSettings::read_from(connection, 0).await?,
            ..Default::default()
        };

        for kind in &self.config.packets {
            match kind {
                PacketKind::Connectivity => settings.connectivity = self.read_slots().await?,
                PacketKind::IBeacon => settings.ibeacon = self.read_slots().await?,
                PacketKind::EddystoneUid => settings.eddystone_uid = self.read_slots().await?,
                PacketKind::EddystoneUrl => settings.eddystone_url = self.read_slots().await?,
                PacketKind::EddystoneTlm => settings.eddystone_tlm = self.read_slots().await?,
                PacketKind::EddystoneEid => settings.eddystone_eid = self.read_slots().await?,
                PacketKind::EstimoteLocation => {
                    settings.estimote_location = self.read_slots().await?
                }
                PacketKind::EstimoteTlm => settings.estimote_tlm = self.read_slots().await?,
            }
        }

        tracing::debug!(settings = settings.setting_count(), "Read device settings");
        Ok(settings)
    }

    /// Read slots in order, stopping at the first slot the device reports
    /// nothing for
    async fn read_slots<G: SettingsGroup>(&self) -> Result<Vec<G>, SettingError> {
        let mut groups = Vec::new();
        for slot in 0..self.config.max_slots_per_packet {
            let group = G::read_from(self.connection.as_ref(), slot).await?;
            if group.is_empty() {
                break;
            }
            groups.push(group);
        }
        Ok(groups)
    }

    /// Write every setting present in `settings`; a group's index is its slot
    ///
    /// Follows the same limits as reads: packet kinds missing from
    /// `config.packets` are not written, and a category with more groups
    /// than `max_slots_per_packet` fails before any I/O. Stops at the first
    /// failure. Returns the number of settings written.
    pub async fn write_device_settings(&self, settings: &DeviceSettings) -> Result<usize, SettingError> {
        let max = self.config.max_slots_per_packet;
        for kind in &self.config.packets {
            let groups = settings.slot_count(*kind);
            if groups > usize::from(max) {
                return Err(SettingError::SlotLimit {
                    packet: *kind,
                    groups,
                    max,
                });
            }
        }

        let connection = self.connection.as_ref();
        let mut written = settings.general.write_to(connection, 0).await?;
        for kind in PacketKind::ALL {
            if !self.config.packets.contains(&kind) {
                if settings.slot_count(kind) > 0 {
                    tracing::warn!(packet = %kind, "Packet kind is not configured, skipping write");
                }
                continue;
            }
            written += match kind {
                PacketKind::Connectivity => write_slots(connection, &settings.connectivity).await?,
                PacketKind::IBeacon => write_slots(connection, &settings.ibeacon).await?,
                PacketKind::EddystoneUid => write_slots(connection, &settings.eddystone_uid).await?,
                PacketKind::EddystoneUrl => write_slots(connection, &settings.eddystone_url).await?,
                PacketKind::EddystoneTlm => write_slots(connection, &settings.eddystone_tlm).await?,
                PacketKind::EddystoneEid => write_slots(connection, &settings.eddystone_eid).await?,
                PacketKind::EstimoteLocation => {
                    write_slots(connection, &settings.estimote_location).await?
                }
                PacketKind::EstimoteTlm => write_slots(connection, &settings.estimote_tlm).await?,
            };
        }

        tracing::debug!(written, "Wrote device settings");
        Ok(written)
    }

    // ===== Cloud Operations =====

    /// Stored dictionary for a device, empty when nothing is stored
    async fn fetch_cloud_dictionary(&self, device_id: &str) -> Result<CloudDictionary, SettingError> {
        let dictionary = self
            .cloud
            .fetch_settings(device_id)
            .await
            .map_err(|e| SettingError::Cloud(format!("{:#}", e)))?;
        Ok(dictionary.unwrap_or_default())
    }

    /// Fetch and decode the cloud snapshot; nothing stored yields an empty one
    pub async fn fetch_cloud_settings(&self, device_id: &str) -> Result<DeviceSettings, SettingError> {
        let dictionary = self.fetch_cloud_dictionary(device_id).await?;
        Ok(DeviceSettings::from_cloud_dictionary(&dictionary))
    }

    /// Merge `update` over the stored snapshot and save the result
    ///
    /// Only the keys `update` carries settings for are replaced in the
    /// stored dictionary. Unknown keys, unknown fields and entries that did
    /// not decode are saved back untouched.
    pub async fn push_cloud_settings(
        &self,
        device_id: &str,
        update: &DeviceSettings,
    ) -> Result<DeviceSettings, SettingError> {
        let mut stored = self.fetch_cloud_dictionary(device_id).await?;
        let merged = DeviceSettings::from_cloud_dictionary(&stored).merged_with(update);
        stored.extend(update.to_cloud_dictionary());

        self.cloud
            .save_settings(device_id, stored)
            .await
            .map_err(|e| SettingError::Cloud(format!("{:#}", e)))?;

        tracing::info!(
            device_id,
            settings = merged.setting_count(),
            "Pushed settings to cloud"
        );
        Ok(merged)
    }

    // ===== Sync Operations =====

    /// Read the device and persist what it reports to the cloud
    pub async fn sync_device_to_cloud(&self, device_id: &str) -> Result<DeviceSettings, SettingError> {
        let device = self.read_device_settings().await?;
        self.push_cloud_settings(device_id, &device).await
    }

    /// Write the cloud snapshot to the device
    pub async fn apply_cloud_settings(&self, device_id: &str) -> Result<usize, SettingError> {
        let settings = self.fetch_cloud_settings(device_id).await?;
        let written = self.write_device_settings(&settings).await?;
        tracing::info!(device_id, written, "Applied cloud settings to device");
        Ok(written)
    }
}

async fn write_slots<G: SettingsGroup>(
    connection: &dyn DeviceConnection,
    groups: &[G],
) -> Result<usize, SettingError> {
    let mut written = 0;
    for (slot, group) in (0..=u8::MAX).zip(groups) {
        written += group.write_to(connection, slot).await?;
    }
    Ok(written)
}
