//! Domain layer - settings model, validation and services

pub mod aggregate;
pub mod eddystone_url;
pub mod groups;
pub mod kinds;
pub mod service;
pub mod setting;

pub use aggregate::DeviceSettings;
pub use groups::{
    AdvertiserSettings, ConnectivitySettings, EddystoneEidSettings, EddystoneTlmSettings,
    EddystoneUidSettings, EddystoneUrlSettings, EstimoteLocationSettings, EstimoteTlmSettings,
    GeneralSettings, IBeaconSettings, SettingsGroup,
};
pub use service::Service;
pub use setting::{Setting, SettingKind};
