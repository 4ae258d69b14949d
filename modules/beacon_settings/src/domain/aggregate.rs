//! Device settings snapshot and merge

use super::groups::{
    ConnectivitySettings, EddystoneEidSettings, EddystoneTlmSettings, EddystoneUidSettings,
    EddystoneUrlSettings, EstimoteLocationSettings, EstimoteTlmSettings, GeneralSettings,
    IBeaconSettings, SettingsGroup,
};
use crate::contract::PacketKind;

/// Full configuration snapshot of one device
///
/// Each packet kind holds its groups in slot order. Snapshots are values:
/// merging produces a new snapshot and leaves both inputs untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSettings {
    pub general: GeneralSettings,
    pub connectivity: Vec<ConnectivitySettings>,
    pub ibeacon: Vec<IBeaconSettings>,
    pub eddystone_uid: Vec<EddystoneUidSettings>,
    pub eddystone_url: Vec<EddystoneUrlSettings>,
    pub eddystone_tlm: Vec<EddystoneTlmSettings>,
    pub eddystone_eid: Vec<EddystoneEidSettings>,
    pub estimote_location: Vec<EstimoteLocationSettings>,
    pub estimote_tlm: Vec<EstimoteTlmSettings>,
}

impl DeviceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no category carries any data
    pub fn is_empty(&self) -> bool {
        self.setting_count() == 0
    }

    /// Number of groups stored for a packet kind
    pub fn slot_count(&self, kind: PacketKind) -> usize {
        match kind {
            PacketKind::Connectivity => self.connectivity.len(),
            PacketKind::IBeacon => self.ibeacon.len(),
            PacketKind::EddystoneUid => self.eddystone_uid.len(),
            PacketKind::EddystoneUrl => self.eddystone_url.len(),
            PacketKind::EddystoneTlm => self.eddystone_tlm.len(),
            PacketKind::EddystoneEid => self.eddystone_eid.len(),
            PacketKind::EstimoteLocation => self.estimote_location.len(),
            PacketKind::EstimoteTlm => self.estimote_tlm.len(),
        }
    }

    /// Total number of settings present across all groups
    pub fn setting_count(&self) -> usize {
        fn count<G: SettingsGroup>(groups: &[G]) -> usize {
            groups.iter().map(SettingsGroup::len).sum()
        }

        self.general.len()
            + count(&self.connectivity)
            + count(&self.ibeacon)
            + count(&self.eddystone_uid)
            + count(&self.eddystone_url)
            + count(&self.eddystone_tlm)
            + count(&self.eddystone_eid)
            + count(&self.estimote_location)
            + count(&self.estimote_tlm)
    }

    /// Override this snapshot with `overrides`, category by category
    ///
    /// A category of `overrides` holding at least one setting replaces the
    /// whole category of `self`; other categories keep `self`'s data. Groups are
    /// not merged field by field.
    pub fn merged_with(&self, overrides: &DeviceSettings) -> DeviceSettings {
        fn pick<G: SettingsGroup>(base: &[G], over: &[G]) -> Vec<G> {
            if !has_settings(over) {
                base.to_vec()
            } else {
                over.to_vec()
            }
        }

        let general = if overrides.general.is_empty() {
            self.general.clone()
        } else {
            overrides.general.clone()
        };

        DeviceSettings {
            general,
            connectivity: pick(&self.connectivity, &overrides.connectivity),
            ibeacon: pick(&self.ibeacon, &overrides.ibeacon),
            eddystone_uid: pick(&self.eddystone_uid, &overrides.eddystone_uid),
            eddystone_url: pick(&self.eddystone_url, &overrides.eddystone_url),
            eddystone_tlm: pick(&self.eddystone_tlm, &overrides.eddystone_tlm),
            eddystone_eid: pick(&self.eddystone_eid, &overrides.eddystone_eid),
            estimote_location: pick(&self.estimote_location, &overrides.estimote_location),
            estimote_tlm: pick(&self.estimote_tlm, &overrides.estimote_tlm),
        }
    }
}

/// True when at least one group carries a setting
pub fn has_settings<G: SettingsGroup>(groups: &[G]) -> bool {
    groups.iter().any(|group| !group.is_empty())
}
