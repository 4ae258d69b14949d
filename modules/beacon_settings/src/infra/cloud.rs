//! In-memory cloud settings store

use crate::contract::{CloudDictionary, CloudSettingsApi};
use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Cloud store keeping one dictionary per device id
#[derive(Clone, Default)]
pub struct InMemoryCloudStore {
    dictionaries: Arc<RwLock<HashMap<String, CloudDictionary>>>,
    unavailable: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryCloudStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the dictionary stored for a device
    pub fn insert(&self, device_id: &str, dictionary: CloudDictionary) {
        self.dictionaries.write().insert(device_id.to_string(), dictionary);
    }

    pub fn get(&self, device_id: &str) -> Option<CloudDictionary> {
        self.dictionaries.read().get(device_id).cloned()
    }

    /// Make every following call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("connection refused"))
                .context("cloud settings store is unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl CloudSettingsApi for InMemoryCloudStore {
    async fn fetch_settings(&self, device_id: &str) -> anyhow::Result<Option<CloudDictionary>> {
        self.check()?;
        Ok(self.get(device_id))
    }

    async fn save_settings(&self, device_id: &str, settings: CloudDictionary) -> anyhow::Result<()> {
        self.check()?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.insert(device_id, settings);
        Ok(())
    }
}
