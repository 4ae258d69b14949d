//! Contract layer - public API for beacon settings
//!
//! Identifiers, the error taxonomy and the traits at the crate's seams.

pub mod client;
pub mod error;
pub mod model;

pub use client::{BeaconSettingsApi, CloudSettingsApi, DeviceConnection};
pub use error::{DecodeError, SettingError, TransportError, ValidationError};
pub use model::{
    CharacteristicId, CloudDictionary, PacketKind, SettingId, GENERAL_KEY, GENERAL_SERVICE_ID,
};
