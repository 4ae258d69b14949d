//! Validated setting values and their device read/write lifecycle

use crate::contract::{
    CharacteristicId, DecodeError, DeviceConnection, PacketKind, SettingError, SettingId,
    ValidationError,
};
use bytes::Bytes;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Describes one kind of setting: its value type, where it lives on the
/// device, how it is validated and how it is encoded on the wire.
pub trait SettingKind: Send + Sync + 'static {
    type Value: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Packet the setting belongs to, `None` for general device settings
    const PACKET: Option<PacketKind>;
    /// Property name, also the field name in the cloud dictionary
    const PROPERTY: &'static str;
    /// Register of the characteristic inside the packet's service
    const REGISTER: u8;

    /// Check a candidate value. Pure, no I/O.
    fn validate(value: &Self::Value) -> Result<(), ValidationError>;

    /// Encode a value into the characteristic payload
    fn encode(value: &Self::Value) -> Result<Bytes, ValidationError>;

    /// Decode a characteristic payload, returning the reason on failure
    fn decode(payload: &[u8]) -> Result<Self::Value, String>;

    fn id() -> SettingId {
        SettingId::new(Self::PACKET, Self::PROPERTY)
    }
}

/// A configuration value that has passed its kind's validation
///
/// There is no way to obtain a `Setting` holding an invalid value. Settings
/// are immutable; writing a new value produces a new `Setting`.
pub struct Setting<K: SettingKind> {
    value: K::Value,
    _kind: PhantomData<fn() -> K>,
}

impl<K: SettingKind> Setting<K> {
    /// Validate `value` and wrap it
    pub fn new(value: K::Value) -> Result<Self, ValidationError> {
        K::validate(&value)?;
        Ok(Self {
            value,
            _kind: PhantomData,
        })
    }

    /// Check a candidate without constructing a setting
    pub fn validate(candidate: &K::Value) -> Result<(), ValidationError> {
        K::validate(candidate)
    }

    /// Current (already validated) value
    pub fn value(&self) -> &K::Value {
        &self.value
    }

    pub fn into_value(self) -> K::Value {
        self.value
    }

    pub fn id() -> SettingId {
        K::id()
    }

    /// Characteristic holding this setting for the given slot
    pub fn characteristic(slot: u8) -> CharacteristicId {
        CharacteristicId::new(K::PACKET, K::REGISTER, slot)
    }

    /// Read the setting from the device
    ///
    /// Transport errors are returned unchanged. A payload that does not
    /// decode, or decodes to a value the kind rejects, is a `Decode` error.
    pub async fn read(connection: &dyn DeviceConnection, slot: u8) -> Result<Self, SettingError> {
        let characteristic = Self::characteristic(slot);
        tracing::debug!(setting = %K::id(), %characteristic, "Reading setting");

        let payload = connection.read_characteristic(characteristic).await?;
        let value = K::decode(&payload).map_err(|reason| DecodeError {
            setting: K::id(),
            reason,
        })?;

        Self::new(value).map_err(|e| {
            SettingError::from(DecodeError {
                setting: K::id(),
                reason: e.to_string(),
            })
        })
    }

    /// Validate `candidate` and write it to the device
    ///
    /// An invalid candidate is rejected before the connection is touched.
    pub async fn write(
        connection: &dyn DeviceConnection,
        slot: u8,
        candidate: K::Value,
    ) -> Result<Self, SettingError> {
        let setting = Self::new(candidate)?;
        setting.apply(connection, slot).await?;
        Ok(setting)
    }

    /// Write the held value to the device
    pub async fn apply(&self, connection: &dyn DeviceConnection, slot: u8) -> Result<(), SettingError> {
        let characteristic = Self::characteristic(slot);
        let payload = K::encode(&self.value)?;
        tracing::debug!(
            setting = %K::id(),
            %characteristic,
            len = payload.len(),
            "Writing setting"
        );

        connection
            .write_characteristic(characteristic, payload)
            .await
            .map_err(SettingError::from)
    }

    /// Completion-style read: the I/O runs on a spawned task and
    /// `completion` is invoked once with the outcome.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn read_with_completion<F>(
        connection: Arc<dyn DeviceConnection>,
        slot: u8,
        completion: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<Self, SettingError>) + Send + 'static,
    {
        tokio::spawn(async move {
            let result = Self::read(connection.as_ref(), slot).await;
            completion(result);
        })
    }

    /// Completion-style write
    ///
    /// An invalid candidate invokes `completion` before this function
    /// returns, spawns nothing and returns `None`. Otherwise the write runs
    /// on a spawned task whose handle is returned.
    pub fn write_with_completion<F>(
        connection: Arc<dyn DeviceConnection>,
        slot: u8,
        candidate: K::Value,
        completion: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<Self, SettingError>) + Send + 'static,
    {
        let setting = match Self::new(candidate) {
            Ok(setting) => setting,
            Err(e) => {
                completion(Err(e.into()));
                return None;
            }
        };

        Some(tokio::spawn(async move {
            let outcome = setting.apply(connection.as_ref(), slot).await;
            completion(outcome.map(|()| setting));
        }))
    }
}

impl<K: SettingKind> Clone for Setting<K> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: SettingKind> fmt::Debug for Setting<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("id", &K::id())
            .field("value", &self.value)
            .finish()
    }
}

impl<K: SettingKind> PartialEq for Setting<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: SettingKind> Eq for Setting<K> where K::Value: Eq {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kinds::EddystoneUrlInterval;

    #[test]
    fn test_construct_below_minimum_fails() {
        let result = Setting::<EddystoneUrlInterval>::new(50);
        assert!(matches!(
            result,
            Err(ValidationError::ValueTooSmall { value: 50, min: 100, .. })
        ));
    }

    #[test]
    fn test_construct_within_bounds() {
        let setting = Setting::<EddystoneUrlInterval>::new(5000).unwrap();
        assert_eq!(*setting.value(), 5000);
    }

    #[test]
    fn test_construct_above_maximum_fails() {
        let result = Setting::<EddystoneUrlInterval>::new(20000);
        assert!(matches!(
            result,
            Err(ValidationError::ValueTooBig { value: 20000, max: 10000, .. })
        ));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Setting::<EddystoneUrlInterval>::validate(&100).is_ok());
        assert!(Setting::<EddystoneUrlInterval>::validate(&10000).is_ok());
        assert!(Setting::<EddystoneUrlInterval>::validate(&99).is_err());
        assert!(Setting::<EddystoneUrlInterval>::validate(&10001).is_err());
    }

    #[test]
    fn test_validation_error_names_the_setting() {
        let err = Setting::<EddystoneUrlInterval>::validate(&0).unwrap_err();
        assert_eq!(err.setting().to_string(), "eddystone_url.interval");
        assert_eq!(
            err.to_string(),
            "eddystone_url.interval: value 0 is too small (minimum 100)"
        );
    }

    #[test]
    fn test_characteristic_uses_packet_service() {
        let id = Setting::<EddystoneUrlInterval>::characteristic(1);
        assert_eq!(id.service, PacketKind::EddystoneUrl.service_id());
        assert_eq!(id.slot, 1);
    }

    #[test]
    fn test_equality_compares_values() {
        let a = Setting::<EddystoneUrlInterval>::new(300).unwrap();
        let b = Setting::<EddystoneUrlInterval>::new(300).unwrap();
        let c = Setting::<EddystoneUrlInterval>::new(400).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.clone().into_value(), 300);
    }
}
