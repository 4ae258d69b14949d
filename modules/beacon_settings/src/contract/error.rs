//! Contract error types for beacon settings
//!
//! Validation errors are raised locally before any device I/O. Transport
//! errors come from the device connection and are passed through unchanged.

use super::model::{CharacteristicId, PacketKind, SettingId};

/// A candidate value was rejected by a setting's validation rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{setting}: value {value} is too small (minimum {min})")]
    ValueTooSmall {
        setting: SettingId,
        value: i64,
        min: i64,
    },

    #[error("{setting}: value {value} is too big (maximum {max})")]
    ValueTooBig {
        setting: SettingId,
        value: i64,
        max: i64,
    },

    #[error("{setting}: {reason}")]
    Invalid { setting: SettingId, reason: String },
}

impl ValidationError {
    /// Setting the rejected value was meant for
    pub fn setting(&self) -> SettingId {
        match self {
            Self::ValueTooSmall { setting, .. }
            | Self::ValueTooBig { setting, .. }
            | Self::Invalid { setting, .. } => *setting,
        }
    }
}

/// Failure reported by the device connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Device is not connected")]
    NotConnected,

    #[error("Characteristic {0} is not supported by the device")]
    CharacteristicNotFound(CharacteristicId),

    #[error("Device rejected access to {characteristic}: {reason}")]
    Rejected {
        characteristic: CharacteristicId,
        reason: String,
    },

    #[error("Transport failure: {0}")]
    Io(String),
}

/// A device payload could not be turned into a valid setting value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{setting}: cannot decode device payload: {reason}")]
pub struct DecodeError {
    pub setting: SettingId,
    pub reason: String,
}

/// Error returned by setting reads and writes and by the settings service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Cloud settings store failure: {0}")]
    Cloud(String),

    #[error("{packet}: {groups} groups exceed the limit of {max} slots")]
    SlotLimit {
        packet: PacketKind,
        groups: usize,
        max: u8,
    },
}

impl SettingError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
