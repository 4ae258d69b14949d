//! Decoding and encoding of the device settings cloud dictionary

use super::dto::{AdvertiserDto, EddystoneUidDto, EddystoneUrlDto, GeneralDto, IBeaconDto};
use crate::contract::{CloudDictionary, PacketKind, ValidationError, GENERAL_KEY};
use crate::domain::aggregate::has_settings;
use crate::domain::{DeviceSettings, SettingsGroup};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An entry (or a whole category) dropped while decoding a cloud dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSkip {
    /// Top-level key of the category
    pub key: &'static str,
    /// Position of the entry in the category list, `None` for the category
    pub index: Option<usize>,
    pub reason: String,
}

impl fmt::Display for DecodeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]: {}", self.key, index, self.reason),
            None => write!(f, "{}: {}", self.key, self.reason),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

fn decode_entry<D, G>(entry: &Value) -> Result<G, String>
where
    D: DeserializeOwned,
    G: TryFrom<D, Error = ValidationError>,
{
    if !entry.is_object() {
        return Err(format!("expected a mapping, found {}", value_kind(entry)));
    }
    let dto = D::deserialize(entry).map_err(|e| e.to_string())?;
    G::try_from(dto).map_err(|e| e.to_string())
}

fn decode_category<D, G>(
    dictionary: &CloudDictionary,
    key: &'static str,
    skips: &mut Vec<DecodeSkip>,
) -> Vec<G>
where
    D: DeserializeOwned,
    G: SettingsGroup + TryFrom<D, Error = ValidationError>,
{
    let entries: Vec<&Value> = match dictionary.get(key) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries.iter().collect(),
        Some(entry @ Value::Object(_)) => vec![entry],
        Some(other) => {
            skips.push(DecodeSkip {
                key,
                index: None,
                reason: format!("expected a list of mappings, found {}", value_kind(other)),
            });
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match decode_entry::<D, G>(entry) {
            Ok(group) if !group.is_empty() => Some(group),
            Ok(_) => {
                skips.push(DecodeSkip {
                    key,
                    index: Some(index),
                    reason: "entry carries no recognised settings".to_string(),
                });
                None
            }
            Err(reason) => {
                skips.push(DecodeSkip {
                    key,
                    index: Some(index),
                    reason,
                });
                None
            }
        })
        .collect()
}

fn encode_category<'a, G, D>(dictionary: &mut CloudDictionary, key: &'static str, groups: &'a [G])
where
    G: SettingsGroup,
    D: Serialize + From<&'a G>,
{
    if !has_settings(groups) {
        return;
    }

    let entries: Vec<Value> = groups
        .iter()
        .enumerate()
        .filter_map(|(index, group)| match serde_json::to_value(D::from(group)) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "Failed to encode settings entry");
                None
            }
        })
        .collect();

    dictionary.insert(key.to_string(), Value::Array(entries));
}

impl DeviceSettings {
    /// Build a snapshot from a cloud dictionary
    ///
    /// Never fails: missing keys give empty categories, malformed entries
    /// are dropped and logged, unknown keys are ignored.
    pub fn from_cloud_dictionary(dictionary: &CloudDictionary) -> Self {
        let (settings, skips) = Self::decode_cloud_dictionary(dictionary);
        for skip in &skips {
            tracing::warn!(
                key = skip.key,
                index = ?skip.index,
                reason = %skip.reason,
                "Skipped malformed cloud settings entry"
            );
        }
        settings
    }

    /// Same as [`DeviceSettings::from_cloud_dictionary`], also returning
    /// every dropped entry
    pub fn decode_cloud_dictionary(dictionary: &CloudDictionary) -> (Self, Vec<DecodeSkip>) {
        let mut skips = Vec::new();

        let general = match dictionary.get(GENERAL_KEY) {
            None | Some(Value::Null) => Default::default(),
            Some(entry) => match decode_entry::<GeneralDto, _>(entry) {
                Ok(general) => general,
                Err(reason) => {
                    skips.push(DecodeSkip {
                        key: GENERAL_KEY,
                        index: None,
                        reason,
                    });
                    Default::default()
                }
            },
        };

        let settings = Self {
            general,
            connectivity: decode_category::<AdvertiserDto, _>(
                dictionary,
                PacketKind::Connectivity.cloud_key(),
                &mut skips,
            ),
            ibeacon: decode_category::<IBeaconDto, _>(
                dictionary,
                PacketKind::IBeacon.cloud_key(),
                &mut skips,
            ),
            eddystone_uid: decode_category::<EddystoneUidDto, _>(
                dictionary,
                PacketKind::EddystoneUid.cloud_key(),
                &mut skips,
            ),
            eddystone_url: decode_category::<EddystoneUrlDto, _>(
                dictionary,
                PacketKind::EddystoneUrl.cloud_key(),
                &mut skips,
            ),
            eddystone_tlm: decode_category::<AdvertiserDto, _>(
                dictionary,
                PacketKind::EddystoneTlm.cloud_key(),
                &mut skips,
            ),
            eddystone_eid: decode_category::<AdvertiserDto, _>(
                dictionary,
                PacketKind::EddystoneEid.cloud_key(),
                &mut skips,
            ),
            estimote_location: decode_category::<AdvertiserDto, _>(
                dictionary,
                PacketKind::EstimoteLocation.cloud_key(),
                &mut skips,
            ),
            estimote_tlm: decode_category::<AdvertiserDto, _>(
                dictionary,
                PacketKind::EstimoteTlm.cloud_key(),
                &mut skips,
            ),
        };

        (settings, skips)
    }

    /// Build a snapshot from any JSON value; anything but a mapping yields
    /// an empty snapshot
    pub fn from_cloud_value(value: &Value) -> Self {
        match value {
            Value::Object(dictionary) => Self::from_cloud_dictionary(dictionary),
            other => {
                tracing::warn!(found = value_kind(other), "Cloud settings are not a mapping");
                Self::default()
            }
        }
    }

    /// Dictionary representation for the cloud
    ///
    /// Categories without any setting are omitted so a partial snapshot
    /// never overwrites server-side data with nothing.
    pub fn to_cloud_dictionary(&self) -> CloudDictionary {
        let mut dictionary = CloudDictionary::new();

        if !self.general.is_empty() {
            match serde_json::to_value(GeneralDto::from(&self.general)) {
                Ok(value) => {
                    dictionary.insert(GENERAL_KEY.to_string(), value);
                }
                Err(e) => tracing::warn!(error = %e, "Failed to encode general settings"),
            }
        }

        encode_category::<_, AdvertiserDto>(
            &mut dictionary,
            PacketKind::Connectivity.cloud_key(),
            &self.connectivity,
        );
        encode_category::<_, IBeaconDto>(
            &mut dictionary,
            PacketKind::IBeacon.cloud_key(),
            &self.ibeacon,
        );
        encode_category::<_, EddystoneUidDto>(
            &mut dictionary,
            PacketKind::EddystoneUid.cloud_key(),
            &self.eddystone_uid,
        );
        encode_category::<_, EddystoneUrlDto>(
            &mut dictionary,
            PacketKind::EddystoneUrl.cloud_key(),
            &self.eddystone_url,
        );
        encode_category::<_, AdvertiserDto>(
            &mut dictionary,
            PacketKind::EddystoneTlm.cloud_key(),
            &self.eddystone_tlm,
        );
        encode_category::<_, AdvertiserDto>(
            &mut dictionary,
            PacketKind::EddystoneEid.cloud_key(),
            &self.eddystone_eid,
        );
        encode_category::<_, AdvertiserDto>(
            &mut dictionary,
            PacketKind::EstimoteLocation.cloud_key(),
            &self.estimote_location,
        );
        encode_category::<_, AdvertiserDto>(
            &mut dictionary,
            PacketKind::EstimoteTlm.cloud_key(),
            &self.estimote_tlm,
        );

        dictionary
    }
}
