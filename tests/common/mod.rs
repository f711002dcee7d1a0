//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use release_channels::store::StoreResult;
use release_channels::{
    Artifact, Channel, ChannelConfig, ChannelManager, ChannelStore, MemoryStore, PromotionRequest,
    Release, StoreError, TestResult,
};

pub const SHA256: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

pub fn release(version: &str, channel: Channel) -> Release {
    Release::new(version, channel)
        .with_released_by("ci")
        .with_changelog(format!("release {}", version))
        .with_artifact(
            Artifact::new(
                "app-linux-amd64.tar.gz",
                "https://downloads.example.com/app-linux-amd64.tar.gz",
                SHA256,
            )
            .for_target("linux", "amd64")
            .with_size(4096),
        )
}

/// A release as it would look after being published at `published_at`
pub fn published_at(version: &str, channel: Channel, published_at: DateTime<Utc>) -> Release {
    let mut release = release(version, channel);
    release.published_at = published_at;
    release
}

/// A request carrying a passing result for each named test
pub fn request_with_tests(
    version: &str,
    from: Channel,
    to: Channel,
    tests: &[&str],
) -> PromotionRequest {
    tests.iter().fold(
        PromotionRequest::new(version, from, to, "release-bot"),
        |request, name| request.with_test_result(TestResult::passed(*name)),
    )
}

pub fn memory_manager() -> (Arc<MemoryStore>, ChannelManager) {
    let store = Arc::new(MemoryStore::new());
    let manager = ChannelManager::new(store.clone());
    manager.initialize().unwrap();
    (store, manager)
}

pub fn all_tests(channel: Channel) -> Vec<String> {
    ChannelConfig::default_for(channel).required_tests
}

fn injected(operation: &str) -> StoreError {
    StoreError::Io(format!("injected fault: {}", operation))
}

/// Wraps a `MemoryStore` and fails selected operations on demand
#[derive(Debug, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    fail_history: AtomicBool,
    fail_saves: AtomicBool,
    fail_list: Mutex<BTreeSet<Channel>>,
    fail_delete: Mutex<BTreeSet<String>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_history_writes(&self) {
        self.fail_history.store(true, Ordering::SeqCst);
    }

    pub fn fail_release_writes(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn fail_listing(&self, channel: Channel) {
        self.fail_list.lock().unwrap().insert(channel);
    }

    pub fn fail_deleting(&self, version: &str) {
        self.fail_delete.lock().unwrap().insert(version.to_string());
    }
}

impl ChannelStore for FaultyStore {
    fn get_release(&self, channel: Channel, version: &str) -> StoreResult<Release> {
        self.inner.get_release(channel, version)
    }

    fn list_releases(&self, channel: Channel) -> StoreResult<Vec<Release>> {
        if self.fail_list.lock().unwrap().contains(&channel) {
            return Err(injected("list_releases"));
        }
        self.inner.list_releases(channel)
    }

    fn save_release(&self, release: &Release) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(injected("save_release"));
        }
        self.inner.save_release(release)
    }

    fn delete_release(&self, channel: Channel, version: &str) -> StoreResult<()> {
        if self.fail_delete.lock().unwrap().contains(version) {
            return Err(injected("delete_release"));
        }
        self.inner.delete_release(channel, version)
    }

    fn get_channel_config(&self, channel: Channel) -> StoreResult<ChannelConfig> {
        self.inner.get_channel_config(channel)
    }

    fn save_channel_config(&self, config: &ChannelConfig) -> StoreResult<()> {
        self.inner.save_channel_config(config)
    }

    fn get_promotion_history(&self, version: &str) -> StoreResult<Vec<PromotionRequest>> {
        self.inner.get_promotion_history(version)
    }

    fn save_promotion_request(&self, request: &PromotionRequest) -> StoreResult<()> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(injected("save_promotion_request"));
        }
        self.inner.save_promotion_request(request)
    }
}

pub fn faulty_manager() -> (Arc<FaultyStore>, ChannelManager) {
    let store = Arc::new(FaultyStore::new());
    let manager = ChannelManager::new(store.clone());
    manager.initialize().unwrap();
    (store, manager)
}
