//! Settings groups: one record per packet instance, composed of settings

use super::kinds::{
    packet, AdvertisingInterval, DeviceName, InstanceId, Major, Minor, MotionDetection,
    NamespaceId, Packet, PacketEnabled, ProximityUuid, SmartPowerMode, TxPower, UrlValue,
};
use super::setting::{Setting, SettingKind};
use crate::contract::{DeviceConnection, SettingError, TransportError, ValidationError};
use async_trait::async_trait;

/// A record of settings that is read from and written to one device slot
#[async_trait]
pub trait SettingsGroup: Clone + Default + Send + Sync + 'static {
    /// True when no field is set
    fn is_empty(&self) -> bool;

    /// Number of fields that are set
    fn len(&self) -> usize;

    /// Read every field from the device. Characteristics the device does not
    /// support are left unset.
    async fn read_from(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError>;

    /// Write every set field to the device, returning how many were written
    async fn write_to(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<usize, SettingError>;
}

async fn read_optional<K: SettingKind>(
    connection: &dyn DeviceConnection,
    slot: u8,
) -> Result<Option<Setting<K>>, SettingError> {
    match Setting::<K>::read(connection, slot).await {
        Ok(setting) => Ok(Some(setting)),
        Err(SettingError::Transport(TransportError::CharacteristicNotFound(id))) => {
            tracing::debug!(setting = %K::id(), characteristic = %id, "Setting not supported by device");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn write_optional<K: SettingKind>(
    setting: &Option<Setting<K>>,
    connection: &dyn DeviceConnection,
    slot: u8,
) -> Result<usize, SettingError> {
    match setting {
        Some(setting) => {
            setting.apply(connection, slot).await?;
            Ok(1)
        }
        None => Ok(0),
    }
}

// ===== Advertiser =====

/// Settings every advertising packet has
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvertiserSettings<P: Packet> {
    pub enabled: Option<Setting<PacketEnabled<P>>>,
    pub interval: Option<Setting<AdvertisingInterval<P>>>,
    pub power: Option<Setting<TxPower<P>>>,
}

pub type ConnectivitySettings = AdvertiserSettings<packet::Connectivity>;
pub type EddystoneTlmSettings = AdvertiserSettings<packet::EddystoneTlm>;
pub type EddystoneEidSettings = AdvertiserSettings<packet::EddystoneEid>;
pub type EstimoteLocationSettings = AdvertiserSettings<packet::EstimoteLocation>;
pub type EstimoteTlmSettings = AdvertiserSettings<packet::EstimoteTlm>;

impl<P: Packet> AdvertiserSettings<P> {
    /// Advertiser with every field set
    pub fn new(enabled: bool, interval: u16, power: i8) -> Result<Self, ValidationError> {
        Ok(Self {
            enabled: Some(Setting::new(enabled)?),
            interval: Some(Setting::new(interval)?),
            power: Some(Setting::new(power)?),
        })
    }
}

#[async_trait]
impl<P: Packet> SettingsGroup for AdvertiserSettings<P> {
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn len(&self) -> usize {
        usize::from(self.enabled.is_some())
            + usize::from(self.interval.is_some())
            + usize::from(self.power.is_some())
    }

    async fn read_from(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError> {
        Ok(Self {
            enabled: read_optional(connection, slot).await?,
            interval: read_optional(connection, slot).await?,
            power: read_optional(connection, slot).await?,
        })
    }

    async fn write_to(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<usize, SettingError> {
        let mut written = write_optional(&self.enabled, connection, slot).await?;
        written += write_optional(&self.interval, connection, slot).await?;
        written += write_optional(&self.power, connection, slot).await?;
        Ok(written)
    }
}

// ===== iBeacon =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IBeaconSettings {
    pub advertiser: AdvertiserSettings<packet::IBeacon>,
    pub proximity_uuid: Option<Setting<ProximityUuid>>,
    pub major: Option<Setting<Major>>,
    pub minor: Option<Setting<Minor>>,
}

#[async_trait]
impl SettingsGroup for IBeaconSettings {
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn len(&self) -> usize {
        self.advertiser.len()
            + usize::from(self.proximity_uuid.is_some())
            + usize::from(self.major.is_some())
            + usize::from(self.minor.is_some())
    }

    async fn read_from(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError> {
        Ok(Self {
            advertiser: AdvertiserSettings::<packet::IBeacon>::read_from(connection, slot).await?,
            proximity_uuid: read_optional(connection, slot).await?,
            major: read_optional(connection, slot).await?,
            minor: read_optional(connection, slot).await?,
        })
    }

    async fn write_to(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<usize, SettingError> {
        let mut written = self.advertiser.write_to(connection, slot).await?;
        written += write_optional(&self.proximity_uuid, connection, slot).await?;
        written += write_optional(&self.major, connection, slot).await?;
        written += write_optional(&self.minor, connection, slot).await?;
        Ok(written)
    }
}

// ===== Eddystone-UID =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EddystoneUidSettings {
    pub advertiser: AdvertiserSettings<packet::EddystoneUid>,
    pub namespace_id: Option<Setting<NamespaceId>>,
    pub instance_id: Option<Setting<InstanceId>>,
}

#[async_trait]
impl SettingsGroup for EddystoneUidSettings {
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn len(&self) -> usize {
        self.advertiser.len()
            + usize::from(self.namespace_id.is_some())
            + usize::from(self.instance_id.is_some())
    }

    async fn read_from(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError> {
        Ok(Self {
            advertiser: AdvertiserSettings::<packet::EddystoneUid>::read_from(connection, slot).await?,
            namespace_id: read_optional(connection, slot).await?,
            instance_id: read_optional(connection, slot).await?,
        })
    }

    async fn write_to(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<usize, SettingError> {
        let mut written = self.advertiser.write_to(connection, slot).await?;
        written += write_optional(&self.namespace_id, connection, slot).await?;
        written += write_optional(&self.instance_id, connection, slot).await?;
        Ok(written)
    }
}

// ===== Eddystone-URL =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EddystoneUrlSettings {
    pub advertiser: AdvertiserSettings<packet::EddystoneUrl>,
    pub url: Option<Setting<UrlValue>>,
}

#[async_trait]
impl SettingsGroup for EddystoneUrlSettings {
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn len(&self) -> usize {
        self.advertiser.len() + usize::from(self.url.is_some())
    }

    async fn read_from(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError> {
        Ok(Self {
            advertiser: AdvertiserSettings::<packet::EddystoneUrl>::read_from(connection, slot).await?,
            url: read_optional(connection, slot).await?,
        })
    }

    async fn write_to(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<usize, SettingError> {
        let mut written = self.advertiser.write_to(connection, slot).await?;
        written += write_optional(&self.url, connection, slot).await?;
        Ok(written)
    }
}

// ===== General =====

/// Device-wide settings, independent of packets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralSettings {
    pub name: Option<Setting<DeviceName>>,
    pub motion_detection: Option<Setting<MotionDetection>>,
    pub smart_power_mode: Option<Setting<SmartPowerMode>>,
}

#[async_trait]
impl SettingsGroup for GeneralSettings {
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn len(&self) -> usize {
        usize::from(self.name.is_some())
            + usize::from(self.motion_detection.is_some())
            + usize::from(self.smart_power_mode.is_some())
    }

    async fn read_from(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError> {
        Ok(Self {
            name: read_optional(connection, slot).await?,
            motion_detection: read_optional(connection, slot).await?,
            smart_power_mode: read_optional(connection, slot).await?,
        })
    }

    async fn write_to(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<usize, SettingError> {
        let mut written = write_optional(&self.name, connection, slot).await?;
        written += write_optional(&self.motion_detection, connection, slot).await?;
        written += write_optional(&self.smart_power_mode, connection, slot).await?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups_are_empty() {
        assert!(GeneralSettings::default().is_empty());
        assert!(IBeaconSettings::default().is_empty());
        assert!(EddystoneUidSettings::default().is_empty());
        assert!(EddystoneUrlSettings::default().is_empty());
        assert!(ConnectivitySettings::default().is_empty());
    }

    #[test]
    fn test_len_counts_nested_advertiser_fields() {
        let group = EddystoneUrlSettings {
            advertiser: AdvertiserSettings::new(true, 500, -4).unwrap(),
            url: Some(Setting::new("https://estimote.com/".to_string()).unwrap()),
        };
        assert_eq!(group.len(), 4);
        assert!(!group.is_empty());
    }

    #[test]
    fn test_advertiser_new_validates_every_field() {
        assert!(EstimoteTlmSettings::new(true, 50, 0).is_err());
        assert!(EstimoteTlmSettings::new(true, 500, 3).is_err());
        assert!(EstimoteTlmSettings::new(false, 500, 0).is_ok());
    }
}
