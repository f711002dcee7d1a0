//! # File-Backed Store
//!
//! One JSON document per release and per channel policy, one JSON array per
//! version's promotion history, and a rewritten index per channel. Writes are
//! serialized by an exclusive lock on the store; reads share it. Every write
//! is fsynced before returning.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::ChannelStore;
use super::errors::{StoreError, StoreResult};
use super::index::{build_index, IndexEntry};
use super::paths::{
    self, config_path, has_json_extension, index_path, promotions_path, release_dir,
    release_path,
};
use crate::channels::{Channel, ChannelConfig, PromotionRequest, Release};
use crate::observability::Event;

/// Filesystem implementation of `ChannelStore`
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory layout if needed
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();

        let mut dirs = vec![
            root.join(paths::CHANNELS_DIR),
            root.join(paths::RELEASES_DIR),
            root.join(paths::PROMOTIONS_DIR),
            root.join(paths::CONFIGS_DIR),
        ];
        dirs.extend(Channel::ALL.iter().map(|c| release_dir(&root, *c)));

        for dir in &dirs {
            fs::create_dir_all(dir).map_err(|e| {
                StoreError::io(format!("failed to create directory {}", dir.display()), e)
            })?;
        }

        Ok(Self {
            root,
            lock: RwLock::new(()),
        })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the denormalized index for `channel`; empty if never written
    pub fn read_index(&self, channel: Channel) -> StoreResult<Vec<IndexEntry>> {
        let _guard = self.read_guard()?;
        let path = index_path(&self.root, channel);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path, "channel index")
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        self.lock.read().map_err(|_| StoreError::lock_poisoned())
    }

    fn write_guard(&self) -> StoreResult<RwLockWriteGuard<'_, ()>> {
        self.lock.write().map_err(|_| StoreError::lock_poisoned())
    }

    fn read_release_unlocked(&self, channel: Channel, version: &str) -> StoreResult<Release> {
        let path = release_path(&self.root, channel, version);
        let release: Release = read_json(&path, "release")?;

        // Distinct versions can share a sanitized file name
        if release.version != version {
            return Err(StoreError::NotFound(path.display().to_string()));
        }

        Ok(release)
    }

    fn list_releases_unlocked(&self, channel: Channel) -> StoreResult<Vec<Release>> {
        let dir = release_dir(&self.root, channel);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            StoreError::io(format!("failed to read channel directory {}", dir.display()), e)
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_json_extension(path))
            .collect();
        paths.sort();

        let mut releases = Vec::with_capacity(paths.len());
        for path in paths {
            match read_json::<Release>(&path, "release") {
                Ok(release) => releases.push(release),
                Err(e) => {
                    tracing::warn!(
                        event = %Event::ReleaseFileSkipped,
                        channel = %channel,
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable release file"
                    );
                }
            }
        }

        Ok(releases)
    }

    /// Rewrite the channel index; failures are logged, never returned
    fn refresh_index(&self, channel: Channel) {
        let result = self
            .list_releases_unlocked(channel)
            .and_then(|releases| {
                write_json(&index_path(&self.root, channel), &build_index(&releases), "channel index")
            });

        if let Err(e) = result {
            tracing::warn!(
                event = %Event::IndexUpdateFailed,
                channel = %channel,
                error = %e,
                "failed to update channel index"
            );
        }
    }

    fn history_unlocked(&self, version: &str) -> StoreResult<Vec<PromotionRequest>> {
        let path = promotions_path(&self.root, version);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path, "promotion history")
    }
}

impl ChannelStore for FileStore {
    fn get_release(&self, channel: Channel, version: &str) -> StoreResult<Release> {
        let _guard = self.read_guard()?;
        self.read_release_unlocked(channel, version)
    }

    fn list_releases(&self, channel: Channel) -> StoreResult<Vec<Release>> {
        let _guard = self.read_guard()?;
        self.list_releases_unlocked(channel)
    }

    fn save_release(&self, release: &Release) -> StoreResult<()> {
        let _guard = self.write_guard()?;

        release
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        let path = release_path(&self.root, release.channel, &release.version);
        match read_json::<Release>(&path, "release") {
            Ok(existing) if existing.version != release.version => {
                return Err(StoreError::InvalidRecord(format!(
                    "version {} collides with stored version {} at {}",
                    release.version,
                    existing.version,
                    path.display()
                )));
            }
            _ => {}
        }

        write_json(&path, release, "release")?;
        self.refresh_index(release.channel);

        Ok(())
    }

    fn delete_release(&self, channel: Channel, version: &str) -> StoreResult<()> {
        let _guard = self.write_guard()?;

        let path = release_path(&self.root, channel, version);
        match read_json::<Release>(&path, "release") {
            Ok(existing) if existing.version != version => {
                return Err(StoreError::NotFound(path.display().to_string()));
            }
            Err(e) if e.is_not_found() => return Err(e),
            // Unreadable documents are still removable
            _ => {}
        }

        fs::remove_file(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(path.display().to_string())
            } else {
                StoreError::io(format!("failed to delete release file {}", path.display()), e)
            }
        })?;

        self.refresh_index(channel);

        Ok(())
    }

    fn get_channel_config(&self, channel: Channel) -> StoreResult<ChannelConfig> {
        let _guard = self.read_guard()?;
        read_json(&config_path(&self.root, channel), "channel config")
    }

    fn save_channel_config(&self, config: &ChannelConfig) -> StoreResult<()> {
        let _guard = self.write_guard()?;
        write_json(&config_path(&self.root, config.name), config, "channel config")
    }

    fn get_promotion_history(&self, version: &str) -> StoreResult<Vec<PromotionRequest>> {
        let _guard = self.read_guard()?;
        let mut history = self.history_unlocked(version)?;

        // Distinct versions can share a sanitized file name
        history.retain(|request| request.version == version);
        Ok(history)
    }

    fn save_promotion_request(&self, request: &PromotionRequest) -> StoreResult<()> {
        let _guard = self.write_guard()?;

        let mut history = self.history_unlocked(&request.version)?;
        history.push(request.clone());

        write_json(
            &promotions_path(&self.root, &request.version),
            &history,
            "promotion history",
        )
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> StoreResult<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(path.display().to_string())
        } else {
            StoreError::io(format!("failed to read {} {}", what, path.display()), e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        StoreError::serialization(format!("failed to parse {} {}", what, path.display()), e)
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, what: &str) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::serialization(format!("failed to serialize {}", what), e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StoreError::io(format!("failed to create directory {}", parent.display()), e)
        })?;
    }

    let mut file = File::create(path).map_err(|e| {
        StoreError::io(format!("failed to create {} {}", what, path.display()), e)
    })?;
    file.write_all(json.as_bytes()).map_err(|e| {
        StoreError::io(format!("failed to write {} {}", what, path.display()), e)
    })?;
    file.sync_all().map_err(|e| {
        StoreError::io(format!("failed to fsync {} {}", what, path.display()), e)
    })
}
