//! Catalog of setting kinds
//!
//! Settings shared by every packet (enabled flag, advertising interval,
//! transmit power) are generic over a [`Packet`] marker. Identity settings
//! are specific to one packet kind; general settings belong to none.

use super::eddystone_url;
use super::setting::SettingKind;
use crate::contract::{PacketKind, SettingId, ValidationError};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Lowest advertising interval accepted by the firmware, in milliseconds
pub const MIN_ADVERTISING_INTERVAL_MS: u16 = 100;
/// Highest advertising interval accepted by the firmware, in milliseconds
pub const MAX_ADVERTISING_INTERVAL_MS: u16 = 10_000;

/// Transmit power levels supported by the radio, in dBm
pub const TX_POWER_LEVELS_DBM: [i8; 8] = [-30, -20, -16, -12, -8, -4, 0, 4];

/// Maximum device name length in UTF-8 bytes
pub const MAX_DEVICE_NAME_LEN: usize = 30;

// ===== Registers =====

pub mod register {
    pub const ENABLED: u8 = 0x01;
    pub const INTERVAL: u8 = 0x02;
    pub const POWER: u8 = 0x03;

    pub const PROXIMITY_UUID: u8 = 0x10;
    pub const MAJOR: u8 = 0x11;
    pub const MINOR: u8 = 0x12;

    pub const NAMESPACE_ID: u8 = 0x10;
    pub const INSTANCE_ID: u8 = 0x11;

    pub const URL: u8 = 0x10;

    pub const NAME: u8 = 0x01;
    pub const MOTION_DETECTION: u8 = 0x02;
    pub const SMART_POWER_MODE: u8 = 0x03;
}

// ===== Packet markers =====

/// Marker for an advertising packet kind
pub trait Packet:
    Copy + Clone + Default + fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    const KIND: PacketKind;
    const MIN_INTERVAL_MS: u16 = MIN_ADVERTISING_INTERVAL_MS;
    const MAX_INTERVAL_MS: u16 = MAX_ADVERTISING_INTERVAL_MS;
}

pub mod packet {
    use super::Packet;
    use crate::contract::PacketKind;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Connectivity;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct IBeacon;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EddystoneUid;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EddystoneUrl;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EddystoneTlm;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EddystoneEid;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EstimoteLocation;
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EstimoteTlm;

    impl Packet for Connectivity {
        const KIND: PacketKind = PacketKind::Connectivity;
    }
    impl Packet for IBeacon {
        const KIND: PacketKind = PacketKind::IBeacon;
    }
    impl Packet for EddystoneUid {
        const KIND: PacketKind = PacketKind::EddystoneUid;
    }
    impl Packet for EddystoneUrl {
        const KIND: PacketKind = PacketKind::EddystoneUrl;
    }
    impl Packet for EddystoneTlm {
        const KIND: PacketKind = PacketKind::EddystoneTlm;
    }
    impl Packet for EddystoneEid {
        const KIND: PacketKind = PacketKind::EddystoneEid;
    }
    impl Packet for EstimoteLocation {
        const KIND: PacketKind = PacketKind::EstimoteLocation;
    }
    impl Packet for EstimoteTlm {
        const KIND: PacketKind = PacketKind::EstimoteTlm;
    }
}

// ===== Payload helpers =====

fn decode_bool(payload: &[u8]) -> Result<bool, String> {
    match payload {
        [0] => Ok(false),
        [1] => Ok(true),
        [other] => Err(format!("expected 0 or 1, got {}", other)),
        _ => Err(format!("expected 1 byte, got {}", payload.len())),
    }
}

fn encode_bool(value: bool) -> Bytes {
    Bytes::copy_from_slice(&[u8::from(value)])
}

fn decode_u16(mut payload: &[u8]) -> Result<u16, String> {
    if payload.len() != 2 {
        return Err(format!("expected 2 bytes, got {}", payload.len()));
    }
    Ok(payload.get_u16_le())
}

fn encode_u16(value: u16) -> Bytes {
    let mut buf = BytesMut::with_capacity(2);
    buf.put_u16_le(value);
    buf.freeze()
}

fn decode_fixed<const N: usize>(payload: &[u8]) -> Result<[u8; N], String> {
    <[u8; N]>::try_from(payload)
        .map_err(|_| format!("expected {} bytes, got {}", N, payload.len()))
}

fn check_range(setting: SettingId, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::ValueTooSmall { setting, value, min });
    }
    if value > max {
        return Err(ValidationError::ValueTooBig { setting, value, max });
    }
    Ok(())
}

// ===== Packet settings =====

/// Whether a packet is being advertised
#[derive(Debug)]
pub struct PacketEnabled<P>(PhantomData<fn() -> P>);

impl<P: Packet> SettingKind for PacketEnabled<P> {
    type Value = bool;
    const PACKET: Option<PacketKind> = Some(P::KIND);
    const PROPERTY: &'static str = "enabled";
    const REGISTER: u8 = register::ENABLED;

    fn validate(_value: &bool) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &bool) -> Result<Bytes, ValidationError> {
        Ok(encode_bool(*value))
    }

    fn decode(payload: &[u8]) -> Result<bool, String> {
        decode_bool(payload)
    }
}

/// Advertising interval of a packet, in milliseconds
#[derive(Debug)]
pub struct AdvertisingInterval<P>(PhantomData<fn() -> P>);

impl<P: Packet> SettingKind for AdvertisingInterval<P> {
    type Value = u16;
    const PACKET: Option<PacketKind> = Some(P::KIND);
    const PROPERTY: &'static str = "interval";
    const REGISTER: u8 = register::INTERVAL;

    fn validate(value: &u16) -> Result<(), ValidationError> {
        check_range(
            Self::id(),
            i64::from(*value),
            i64::from(P::MIN_INTERVAL_MS),
            i64::from(P::MAX_INTERVAL_MS),
        )
    }

    fn encode(value: &u16) -> Result<Bytes, ValidationError> {
        Ok(encode_u16(*value))
    }

    fn decode(payload: &[u8]) -> Result<u16, String> {
        decode_u16(payload)
    }
}

/// Transmit power of a packet, in dBm
#[derive(Debug)]
pub struct TxPower<P>(PhantomData<fn() -> P>);

impl<P: Packet> SettingKind for TxPower<P> {
    type Value = i8;
    const PACKET: Option<PacketKind> = Some(P::KIND);
    const PROPERTY: &'static str = "power";
    const REGISTER: u8 = register::POWER;

    fn validate(value: &i8) -> Result<(), ValidationError> {
        let min = TX_POWER_LEVELS_DBM[0];
        let max = TX_POWER_LEVELS_DBM[TX_POWER_LEVELS_DBM.len() - 1];
        check_range(Self::id(), i64::from(*value), i64::from(min), i64::from(max))?;

        if !TX_POWER_LEVELS_DBM.contains(value) {
            return Err(ValidationError::Invalid {
                setting: Self::id(),
                reason: format!(
                    "{} dBm is not a supported power level {:?}",
                    value, TX_POWER_LEVELS_DBM
                ),
            });
        }
        Ok(())
    }

    fn encode(value: &i8) -> Result<Bytes, ValidationError> {
        let mut buf = BytesMut::with_capacity(1);
        buf.put_i8(*value);
        Ok(buf.freeze())
    }

    fn decode(mut payload: &[u8]) -> Result<i8, String> {
        if payload.len() != 1 {
            return Err(format!("expected 1 byte, got {}", payload.len()));
        }
        Ok(payload.get_i8())
    }
}

pub type EddystoneUrlInterval = AdvertisingInterval<packet::EddystoneUrl>;

// ===== iBeacon identity =====

#[derive(Debug)]
pub struct ProximityUuid;

impl SettingKind for ProximityUuid {
    type Value = Uuid;
    const PACKET: Option<PacketKind> = Some(PacketKind::IBeacon);
    const PROPERTY: &'static str = "uuid";
    const REGISTER: u8 = register::PROXIMITY_UUID;

    fn validate(_value: &Uuid) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &Uuid) -> Result<Bytes, ValidationError> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn decode(payload: &[u8]) -> Result<Uuid, String> {
        Uuid::from_slice(payload).map_err(|e| e.to_string())
    }
}

#[derive(Debug)]
pub struct Major;

impl SettingKind for Major {
    type Value = u16;
    const PACKET: Option<PacketKind> = Some(PacketKind::IBeacon);
    const PROPERTY: &'static str = "major";
    const REGISTER: u8 = register::MAJOR;

    fn validate(_value: &u16) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &u16) -> Result<Bytes, ValidationError> {
        Ok(encode_u16(*value))
    }

    fn decode(payload: &[u8]) -> Result<u16, String> {
        decode_u16(payload)
    }
}

#[derive(Debug)]
pub struct Minor;

impl SettingKind for Minor {
    type Value = u16;
    const PACKET: Option<PacketKind> = Some(PacketKind::IBeacon);
    const PROPERTY: &'static str = "minor";
    const REGISTER: u8 = register::MINOR;

    fn validate(_value: &u16) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &u16) -> Result<Bytes, ValidationError> {
        Ok(encode_u16(*value))
    }

    fn decode(payload: &[u8]) -> Result<u16, String> {
        decode_u16(payload)
    }
}

// ===== Eddystone identity =====

/// 10-byte Eddystone-UID namespace
#[derive(Debug)]
pub struct NamespaceId;

impl SettingKind for NamespaceId {
    type Value = [u8; 10];
    const PACKET: Option<PacketKind> = Some(PacketKind::EddystoneUid);
    const PROPERTY: &'static str = "namespace_id";
    const REGISTER: u8 = register::NAMESPACE_ID;

    fn validate(_value: &[u8; 10]) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &[u8; 10]) -> Result<Bytes, ValidationError> {
        Ok(Bytes::copy_from_slice(value))
    }

    fn decode(payload: &[u8]) -> Result<[u8; 10], String> {
        decode_fixed(payload)
    }
}

/// 6-byte Eddystone-UID instance
#[derive(Debug)]
pub struct InstanceId;

impl SettingKind for InstanceId {
    type Value = [u8; 6];
    const PACKET: Option<PacketKind> = Some(PacketKind::EddystoneUid);
    const PROPERTY: &'static str = "instance_id";
    const REGISTER: u8 = register::INSTANCE_ID;

    fn validate(_value: &[u8; 6]) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &[u8; 6]) -> Result<Bytes, ValidationError> {
        Ok(Bytes::copy_from_slice(value))
    }

    fn decode(payload: &[u8]) -> Result<[u8; 6], String> {
        decode_fixed(payload)
    }
}

/// URL broadcast in Eddystone-URL frames
#[derive(Debug)]
pub struct UrlValue;

impl SettingKind for UrlValue {
    type Value = String;
    const PACKET: Option<PacketKind> = Some(PacketKind::EddystoneUrl);
    const PROPERTY: &'static str = "url";
    const REGISTER: u8 = register::URL;

    fn validate(value: &String) -> Result<(), ValidationError> {
        Self::encode(value).map(|_| ())
    }

    fn encode(value: &String) -> Result<Bytes, ValidationError> {
        eddystone_url::encode(value).map_err(|e| match e {
            eddystone_url::UrlError::TooLong(len) => ValidationError::ValueTooBig {
                setting: Self::id(),
                value: len as i64,
                max: eddystone_url::MAX_ENCODED_LEN as i64,
            },
            eddystone_url::UrlError::Empty => ValidationError::ValueTooSmall {
                setting: Self::id(),
                value: 0,
                min: 1,
            },
            other => ValidationError::Invalid {
                setting: Self::id(),
                reason: other.to_string(),
            },
        })
    }

    fn decode(payload: &[u8]) -> Result<String, String> {
        eddystone_url::decode(payload).map_err(|e| e.to_string())
    }
}

// ===== General settings =====

#[derive(Debug)]
pub struct DeviceName;

impl SettingKind for DeviceName {
    type Value = String;
    const PACKET: Option<PacketKind> = None;
    const PROPERTY: &'static str = "name";
    const REGISTER: u8 = register::NAME;

    fn validate(value: &String) -> Result<(), ValidationError> {
        check_range(Self::id(), value.len() as i64, 1, MAX_DEVICE_NAME_LEN as i64)?;
        if value.chars().any(char::is_control) {
            return Err(ValidationError::Invalid {
                setting: Self::id(),
                reason: "name contains control characters".to_string(),
            });
        }
        Ok(())
    }

    fn encode(value: &String) -> Result<Bytes, ValidationError> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn decode(payload: &[u8]) -> Result<String, String> {
        String::from_utf8(payload.to_vec()).map_err(|e| e.to_string())
    }
}

#[derive(Debug)]
pub struct MotionDetection;

impl SettingKind for MotionDetection {
    type Value = bool;
    const PACKET: Option<PacketKind> = None;
    const PROPERTY: &'static str = "motion_detection_enabled";
    const REGISTER: u8 = register::MOTION_DETECTION;

    fn validate(_value: &bool) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &bool) -> Result<Bytes, ValidationError> {
        Ok(encode_bool(*value))
    }

    fn decode(payload: &[u8]) -> Result<bool, String> {
        decode_bool(payload)
    }
}

#[derive(Debug)]
pub struct SmartPowerMode;

impl SettingKind for SmartPowerMode {
    type Value = bool;
    const PACKET: Option<PacketKind> = None;
    const PROPERTY: &'static str = "smart_power_mode_enabled";
    const REGISTER: u8 = register::SMART_POWER_MODE;

    fn validate(_value: &bool) -> Result<(), ValidationError> {
        Ok(())
    }

    fn encode(value: &bool) -> Result<Bytes, ValidationError> {
        Ok(encode_bool(*value))
    }

    fn decode(payload: &[u8]) -> Result<bool, String> {
        decode_bool(payload)
    }
}
