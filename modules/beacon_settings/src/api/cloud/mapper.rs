//! Conversions between cloud DTOs and settings groups
//!
//! DTO -> group conversions validate every present field; one rejected
//! field rejects the whole entry.

use super::dto::*;
use crate::contract::ValidationError;
use crate::domain::groups::{
    AdvertiserSettings, EddystoneUidSettings, EddystoneUrlSettings, GeneralSettings,
    IBeaconSettings,
};
use crate::domain::kinds::{InstanceId, NamespaceId, Packet};
use crate::domain::setting::{Setting, SettingKind};

fn lift<K: SettingKind>(value: Option<K::Value>) -> Result<Option<Setting<K>>, ValidationError> {
    value.map(Setting::<K>::new).transpose()
}

fn lower<K: SettingKind>(setting: &Option<Setting<K>>) -> Option<K::Value> {
    setting.as_ref().map(|s| s.value().clone())
}

fn parse_hex<K, const N: usize>(value: Option<String>) -> Result<Option<[u8; N]>, ValidationError>
where
    K: SettingKind<Value = [u8; N]>,
{
    value
        .map(|hex_str| {
            let mut bytes = [0u8; N];
            hex::decode_to_slice(hex_str.trim(), &mut bytes).map_err(|e| {
                ValidationError::Invalid {
                    setting: K::id(),
                    reason: format!("expected {} hex-encoded bytes: {}", N, e),
                }
            })?;
            Ok(bytes)
        })
        .transpose()
}

// ===== Advertiser conversions =====

impl<P: Packet> TryFrom<AdvertiserDto> for AdvertiserSettings<P> {
    type Error = ValidationError;

    fn try_from(dto: AdvertiserDto) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: lift(dto.enabled)?,
            interval: lift(dto.interval)?,
            power: lift(dto.power)?,
        })
    }
}

impl<P: Packet> From<&AdvertiserSettings<P>> for AdvertiserDto {
    fn from(settings: &AdvertiserSettings<P>) -> Self {
        Self {
            enabled: lower(&settings.enabled),
            interval: lower(&settings.interval),
            power: lower(&settings.power),
        }
    }
}

// ===== iBeacon conversions =====

impl TryFrom<IBeaconDto> for IBeaconSettings {
    type Error = ValidationError;

    fn try_from(dto: IBeaconDto) -> Result<Self, Self::Error> {
        Ok(Self {
            advertiser: dto.advertiser.try_into()?,
            proximity_uuid: lift(dto.uuid)?,
            major: lift(dto.major)?,
            minor: lift(dto.minor)?,
        })
    }
}

impl From<&IBeaconSettings> for IBeaconDto {
    fn from(settings: &IBeaconSettings) -> Self {
        Self {
            advertiser: (&settings.advertiser).into(),
            uuid: lower(&settings.proximity_uuid),
            major: lower(&settings.major),
            minor: lower(&settings.minor),
        }
    }
}

// ===== Eddystone conversions =====

impl TryFrom<EddystoneUidDto> for EddystoneUidSettings {
    type Error = ValidationError;

    fn try_from(dto: EddystoneUidDto) -> Result<Self, Self::Error> {
        Ok(Self {
            advertiser: dto.advertiser.try_into()?,
            namespace_id: lift(parse_hex::<NamespaceId, 10>(dto.namespace_id)?)?,
            instance_id: lift(parse_hex::<InstanceId, 6>(dto.instance_id)?)?,
        })
    }
}

impl From<&EddystoneUidSettings> for EddystoneUidDto {
    fn from(settings: &EddystoneUidSettings) -> Self {
        Self {
            advertiser: (&settings.advertiser).into(),
            namespace_id: settings.namespace_id.as_ref().map(|s| hex::encode(s.value())),
            instance_id: settings.instance_id.as_ref().map(|s| hex::encode(s.value())),
        }
    }
}

impl TryFrom<EddystoneUrlDto> for EddystoneUrlSettings {
    type Error = ValidationError;

    fn try_from(dto: EddystoneUrlDto) -> Result<Self, Self::Error> {
        Ok(Self {
            advertiser: dto.advertiser.try_into()?,
            url: lift(dto.url)?,
        })
    }
}

impl From<&EddystoneUrlSettings> for EddystoneUrlDto {
    fn from(settings: &EddystoneUrlSettings) -> Self {
        Self {
            advertiser: (&settings.advertiser).into(),
            url: lower(&settings.url),
        }
    }
}

// ===== General conversions =====

impl TryFrom<GeneralDto> for GeneralSettings {
    type Error = ValidationError;

    fn try_from(dto: GeneralDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: lift(dto.name)?,
            motion_detection: lift(dto.motion_detection_enabled)?,
            smart_power_mode: lift(dto.smart_power_mode_enabled)?,
        })
    }
}

impl From<&GeneralSettings> for GeneralDto {
    fn from(settings: &GeneralSettings) -> Self {
        Self {
            name: lower(&settings.name),
            motion_detection_enabled: lower(&settings.motion_detection),
            smart_power_mode_enabled: lower(&settings.smart_power_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::groups::ConnectivitySettings;

    #[test]
    fn test_advertiser_dto_is_validated() {
        let dto = AdvertiserDto {
            enabled: Some(true),
            interval: Some(20),
            power: None,
        };
        let result = ConnectivitySettings::try_from(dto);
        assert!(matches!(result, Err(ValidationError::ValueTooSmall { .. })));
    }

    #[test]
    fn test_missing_fields_stay_unset() {
        let settings = ConnectivitySettings::try_from(AdvertiserDto {
            power: Some(-4),
            ..Default::default()
        })
        .unwrap();
        assert!(settings.enabled.is_none());
        assert!(settings.interval.is_none());
        assert_eq!(settings.power.map(|p| p.into_value()), Some(-4));
    }

    #[test]
    fn test_uid_hex_is_parsed_and_rendered() {
        let dto = EddystoneUidDto {
            namespace_id: Some("EDD1EBEAC04E5DEFA017".to_string()),
            instance_id: Some("0BDB87539B67".to_string()),
            ..Default::default()
        };
        let settings = EddystoneUidSettings::try_from(dto).unwrap();
        assert_eq!(
            settings.namespace_id.as_ref().map(|s| *s.value()),
            Some([0xed, 0xd1, 0xeb, 0xea, 0xc0, 0x4e, 0x5d, 0xef, 0xa0, 0x17])
        );

        let rendered = EddystoneUidDto::from(&settings);
        assert_eq!(rendered.namespace_id.as_deref(), Some("edd1ebeac04e5defa017"));
        assert_eq!(rendered.instance_id.as_deref(), Some("0bdb87539b67"));
    }

    #[test]
    fn test_uid_hex_with_wrong_length_is_rejected() {
        let dto = EddystoneUidDto {
            instance_id: Some("0bdb87".to_string()),
            ..Default::default()
        };
        let err = EddystoneUidSettings::try_from(dto).unwrap_err();
        assert_eq!(err.setting().to_string(), "eddystone_uid.instance_id");
    }
}
