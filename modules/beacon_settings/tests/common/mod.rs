//! Common test utilities and shared device fixtures

#![allow(dead_code)]

use beacon_settings::config::Config;
use beacon_settings::contract::CloudDictionary;
use beacon_settings::domain::kinds::{
    packet, AdvertisingInterval, DeviceName, Major, Minor, PacketEnabled, ProximityUuid, TxPower,
    UrlValue,
};
use beacon_settings::domain::Service;
use beacon_settings::infra::{InMemoryCloudStore, InMemoryDevice};
use std::sync::Arc;
use uuid::Uuid;

pub const DEVICE_ID: &str = "d3c7a2f1e0b94c58";

/// A simulated device with its cloud store and the service over both
pub struct Fixture {
    pub device: InMemoryDevice,
    pub cloud: InMemoryCloudStore,
    pub service: Service,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let device = InMemoryDevice::new();
        let cloud = InMemoryCloudStore::new();
        let service = Service::new(Arc::new(device.clone()), Arc::new(cloud.clone()), config);
        Self {
            device,
            cloud,
            service,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn proximity_uuid() -> Uuid {
    Uuid::from_u128(0xb9407f30_f5f8_466e_aff9_25556b57fe6d)
}

/// Seed a device with a name, one iBeacon slot and one Eddystone-URL slot
pub fn seed_device(device: &InMemoryDevice) {
    device.store::<DeviceName>(0, &"Lobby".to_string()).unwrap();

    device.store::<PacketEnabled<packet::IBeacon>>(0, &true).unwrap();
    device.store::<AdvertisingInterval<packet::IBeacon>>(0, &950).unwrap();
    device.store::<TxPower<packet::IBeacon>>(0, &-12).unwrap();
    device.store::<ProximityUuid>(0, &proximity_uuid()).unwrap();
    device.store::<Major>(0, &100).unwrap();
    device.store::<Minor>(0, &7).unwrap();

    device.store::<PacketEnabled<packet::EddystoneUrl>>(0, &true).unwrap();
    device.store::<AdvertisingInterval<packet::EddystoneUrl>>(0, &1000).unwrap();
    device.store::<UrlValue>(0, &"https://estimote.com/".to_string()).unwrap();
}

pub fn dictionary(value: serde_json::Value) -> CloudDictionary {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
