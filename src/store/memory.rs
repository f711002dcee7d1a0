//! # In-Memory Store
//!
//! Same contract as `FileStore`, held in process memory. Useful for tests and
//! for embedders that persist elsewhere.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::backend::ChannelStore;
use super::errors::{StoreError, StoreResult};
use crate::channels::{Channel, ChannelConfig, PromotionRequest, Release};

/// `ChannelStore` backed by in-memory maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    releases: RwLock<BTreeMap<(Channel, String), Release>>,
    configs: RwLock<HashMap<Channel, ChannelConfig>>,
    history: RwLock<HashMap<String, Vec<PromotionRequest>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelStore for MemoryStore {
    fn get_release(&self, channel: Channel, version: &str) -> StoreResult<Release> {
        let releases = self.releases.read().map_err(|_| StoreError::lock_poisoned())?;
        releases
            .get(&(channel, version.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("release {}/{}", channel, version)))
    }

    fn list_releases(&self, channel: Channel) -> StoreResult<Vec<Release>> {
        let releases = self.releases.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(releases
            .iter()
            .filter(|((c, _), _)| *c == channel)
            .map(|(_, release)| release.clone())
            .collect())
    }

    fn save_release(&self, release: &Release) -> StoreResult<()> {
        release
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        let mut releases = self.releases.write().map_err(|_| StoreError::lock_poisoned())?;
        releases.insert((release.channel, release.version.clone()), release.clone());
        Ok(())
    }

    fn delete_release(&self, channel: Channel, version: &str) -> StoreResult<()> {
        let mut releases = self.releases.write().map_err(|_| StoreError::lock_poisoned())?;
        releases
            .remove(&(channel, version.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("release {}/{}", channel, version)))
    }

    fn get_channel_config(&self, channel: Channel) -> StoreResult<ChannelConfig> {
        let configs = self.configs.read().map_err(|_| StoreError::lock_poisoned())?;
        configs
            .get(&channel)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("config {}", channel)))
    }

    fn save_channel_config(&self, config: &ChannelConfig) -> StoreResult<()> {
        let mut configs = self.configs.write().map_err(|_| StoreError::lock_poisoned())?;
        configs.insert(config.name, config.clone());
        Ok(())
    }

    fn get_promotion_history(&self, version: &str) -> StoreResult<Vec<PromotionRequest>> {
        let history = self.history.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(history.get(version).cloned().unwrap_or_default())
    }

    fn save_promotion_request(&self, request: &PromotionRequest) -> StoreResult<()> {
        let mut history = self.history.write().map_err(|_| StoreError::lock_poisoned())?;
        history
            .entry(request.version.clone())
            .or_default()
            .push(request.clone());
        Ok(())
    }
}
