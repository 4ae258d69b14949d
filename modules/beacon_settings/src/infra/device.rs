//! Simulated beacon exposing characteristics from memory

use crate::contract::{CharacteristicId, DeviceConnection, TransportError, ValidationError};
use crate::domain::SettingKind;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory device connection
///
/// Reads of characteristics never stored fail with
/// `CharacteristicNotFound`, like a device that does not support them.
/// Every call reaching the connection is counted, including failed ones.
#[derive(Clone, Default)]
pub struct InMemoryDevice {
    characteristics: Arc<RwLock<HashMap<CharacteristicId, Bytes>>>,
    failure: Arc<RwLock<Option<TransportError>>>,
    disconnected: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl InMemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every read and write by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Store the encoded form of `value` for the kind's characteristic
    ///
    /// Only encoding is applied, so ranges are not checked and payloads the
    /// kind would reject on read can be seeded.
    pub fn store<K: SettingKind>(&self, slot: u8, value: &K::Value) -> Result<(), ValidationError> {
        let payload = K::encode(value)?;
        let id = CharacteristicId::new(K::PACKET, K::REGISTER, slot);
        self.characteristics.write().insert(id, payload);
        Ok(())
    }

    /// Store a raw payload
    pub fn store_raw(&self, id: CharacteristicId, payload: impl Into<Bytes>) {
        self.characteristics.write().insert(id, payload.into());
    }

    /// Raw payload currently held for a characteristic
    pub fn raw(&self, id: CharacteristicId) -> Option<Bytes> {
        self.characteristics.read().get(&id).cloned()
    }

    pub fn characteristic_count(&self) -> usize {
        self.characteristics.read().len()
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: TransportError) {
        *self.failure.write() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.disconnected.store(false, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn check(&self) -> Result<(), TransportError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        match self.failure.read().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeviceConnection for InMemoryDevice {
    async fn read_characteristic(&self, id: CharacteristicId) -> Result<Bytes, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        self.characteristics
            .read()
            .get(&id)
            .cloned()
            .ok_or(TransportError::CharacteristicNotFound(id))
    }

    async fn write_characteristic(
        &self,
        id: CharacteristicId,
        payload: Bytes,
    ) -> Result<(), TransportError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        self.characteristics.write().insert(id, payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PacketKind;
    use crate::domain::kinds::{packet, AdvertisingInterval};

    #[tokio::test]
    async fn test_unknown_characteristic_is_not_found() {
        let device = InMemoryDevice::new();
        let id = CharacteristicId::new(Some(PacketKind::IBeacon), 0x02, 0);
        let err = device.read_characteristic(id).await.unwrap_err();
        assert_eq!(err, TransportError::CharacteristicNotFound(id));
        assert_eq!(device.read_count(), 1);
    }

    #[tokio::test]
    async fn test_store_uses_kind_address() {
        let device = InMemoryDevice::new();
        device
            .store::<AdvertisingInterval<packet::EddystoneUrl>>(1, &500)
            .unwrap();
        let id = CharacteristicId::new(Some(PacketKind::EddystoneUrl), 0x02, 1);
        assert_eq!(device.raw(id).as_deref(), Some(&[0xf4, 0x01][..]));
    }

    #[tokio::test]
    async fn test_disconnect_and_failure_injection() {
        let device = InMemoryDevice::new();
        let id = CharacteristicId::new(None, 0x01, 0);

        device.disconnect();
        assert_eq!(
            device.write_characteristic(id, Bytes::from_static(b"x")).await,
            Err(TransportError::NotConnected)
        );
        device.reconnect();

        device.fail_with(TransportError::Io("link lost".to_string()));
        assert!(matches!(
            device.read_characteristic(id).await,
            Err(TransportError::Io(_))
        ));
        device.clear_failure();

        device.write_characteristic(id, Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(device.write_count(), 2);
        assert_eq!(device.characteristic_count(), 1);
    }
}
