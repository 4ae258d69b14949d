//! Cloud dictionary DTOs with serde derives
//!
//! Every field is optional: absent fields stay unset, unknown fields are
//! ignored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields shared by every packet entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvertiserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Advertising interval in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u16>,

    /// Transmit power in dBm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IBeaconDto {
    #[serde(flatten)]
    pub advertiser: AdvertiserDto,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EddystoneUidDto {
    #[serde(flatten)]
    pub advertiser: AdvertiserDto,

    /// 10 bytes, hex encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<String>,

    /// 6 bytes, hex encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EddystoneUrlDto {
    #[serde(flatten)]
    pub advertiser: AdvertiserDto,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_detection_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_power_mode_enabled: Option<bool>,
}
