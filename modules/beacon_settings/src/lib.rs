//! Beacon Settings Module
//!
//! Validated configuration settings for BLE beacons. Settings are read from
//! and written to a connected device through a [`contract::DeviceConnection`]
//! and mirrored to a cloud store as a JSON dictionary.

// Public exports
pub mod contract;
pub use contract::{
    client::BeaconSettingsApi, error::SettingError, CharacteristicId, CloudDictionary,
    PacketKind, SettingId,
};

pub mod domain;
pub use domain::{DeviceSettings, Setting, SettingKind};

pub mod module;
pub use module::BeaconSettingsModule;

pub mod config;
pub use config::Config;

pub mod infra;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
