//! Contract models for beacon settings
//!
//! Identifiers shared by the domain, the cloud mapping and the device
//! connection. Settings groups and the aggregate live in the domain layer.

use serde::Deserialize;
use std::fmt;

/// Cloud dictionary exchanged with the settings storage service
pub type CloudDictionary = serde_json::Map<String, serde_json::Value>;

/// Advertising packet kinds a beacon can broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum PacketKind {
    #[serde(rename = "connectivity")]
    Connectivity,
    #[serde(rename = "ibeacon")]
    IBeacon,
    #[serde(rename = "eddystone_uid")]
    EddystoneUid,
    #[serde(rename = "eddystone_url")]
    EddystoneUrl,
    #[serde(rename = "eddystone_tlm")]
    EddystoneTlm,
    #[serde(rename = "eddystone_eid")]
    EddystoneEid,
    #[serde(rename = "estimote_location")]
    EstimoteLocation,
    #[serde(rename = "estimote_tlm")]
    EstimoteTlm,
}

impl PacketKind {
    /// All packet kinds, in cloud dictionary order
    pub const ALL: [PacketKind; 8] = [
        PacketKind::Connectivity,
        PacketKind::IBeacon,
        PacketKind::EddystoneUid,
        PacketKind::EddystoneUrl,
        PacketKind::EddystoneTlm,
        PacketKind::EddystoneEid,
        PacketKind::EstimoteLocation,
        PacketKind::EstimoteTlm,
    ];

    /// Top-level key of this packet's settings in the cloud dictionary
    pub fn cloud_key(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::IBeacon => "ibeacon",
            Self::EddystoneUid => "eddystone_uid",
            Self::EddystoneUrl => "eddystone_url",
            Self::EddystoneTlm => "eddystone_tlm",
            Self::EddystoneEid => "eddystone_eid",
            Self::EstimoteLocation => "estimote_location",
            Self::EstimoteTlm => "estimote_tlm",
        }
    }

    /// GATT service byte the packet's characteristics live under
    pub fn service_id(self) -> u8 {
        match self {
            Self::Connectivity => 0x01,
            Self::IBeacon => 0x02,
            Self::EddystoneUid => 0x03,
            Self::EddystoneUrl => 0x04,
            Self::EddystoneTlm => 0x05,
            Self::EddystoneEid => 0x06,
            Self::EstimoteLocation => 0x07,
            Self::EstimoteTlm => 0x08,
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cloud_key())
    }
}

/// Cloud key and service byte of the packet-independent settings
pub const GENERAL_KEY: &str = "general";
pub const GENERAL_SERVICE_ID: u8 = 0x00;

/// Identifies one setting: the packet it belongs to (none for general
/// settings) and its property name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingId {
    pub packet: Option<PacketKind>,
    pub property: &'static str,
}

impl SettingId {
    pub const fn new(packet: Option<PacketKind>, property: &'static str) -> Self {
        Self { packet, property }
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.packet {
            Some(packet) => write!(f, "{}.{}", packet, self.property),
            None => write!(f, "{}.{}", GENERAL_KEY, self.property),
        }
    }
}

/// Address of a device characteristic handed to the connection
///
/// `slot` selects one of several simultaneous instances of the same packet
/// kind; general settings always use slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacteristicId {
    pub service: u8,
    pub register: u8,
    pub slot: u8,
}

impl CharacteristicId {
    pub fn new(packet: Option<PacketKind>, register: u8, slot: u8) -> Self {
        Self {
            service: packet.map_or(GENERAL_SERVICE_ID, PacketKind::service_id),
            register,
            slot,
        }
    }
}

impl fmt::Display for CharacteristicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}{:02x}/{}", self.service, self.register, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_id_display() {
        let id = SettingId::new(Some(PacketKind::EddystoneUrl), "interval");
        assert_eq!(id.to_string(), "eddystone_url.interval");

        let general = SettingId::new(None, "name");
        assert_eq!(general.to_string(), "general.name");
    }

    #[test]
    fn test_characteristic_id_addresses_service_and_slot() {
        let id = CharacteristicId::new(Some(PacketKind::IBeacon), 0x02, 1);
        assert_eq!(id.service, 0x02);
        assert_eq!(id.to_string(), "0x0202/1");

        let general = CharacteristicId::new(None, 0x01, 0);
        assert_eq!(general.service, GENERAL_SERVICE_ID);
    }

    #[test]
    fn test_cloud_keys_are_unique() {
        let mut keys: Vec<_> = PacketKind::ALL.iter().map(|k| k.cloud_key()).collect();
        keys.push(GENERAL_KEY);
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), PacketKind::ALL.len() + 1);
    }

    #[test]
    fn test_packet_kind_deserializes_from_cloud_key() {
        let kind: PacketKind = serde_json::from_str("\"ibeacon\"").unwrap();
        assert_eq!(kind, PacketKind::IBeacon);
        let kind: PacketKind = serde_json::from_str("\"estimote_tlm\"").unwrap();
        assert_eq!(kind, PacketKind::EstimoteTlm);
    }
}
