//! # Releases
//!
//! A release is identified by `(channel, version)`. Promotion creates a new
//! record in the target channel; the source record is never moved.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::errors::{ChannelError, ChannelResult};

/// A software release published in one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    pub channel: Channel,
    #[serde(default)]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub released_by: String,
    #[serde(default)]
    pub changelog: String,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_from: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated_at: Option<DateTime<Utc>>,
}

/// One build output of a release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub arch: String,
    pub url: String,
    #[serde(default)]
    pub size: u64,
    pub checksum: String,
    #[serde(default)]
    pub checksum_alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Another package a release depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Release {
    /// Create an unpublished release with no artifacts.
    ///
    /// `published_at` is stamped by the manager when the release is published.
    pub fn new(version: impl Into<String>, channel: Channel) -> Self {
        Self {
            version: version.into(),
            channel,
            published_at: DateTime::<Utc>::default(),
            released_by: String::new(),
            changelog: String::new(),
            artifacts: Vec::new(),
            dependencies: Vec::new(),
            metadata: BTreeMap::new(),
            promoted: false,
            promoted_from: None,
            promoted_at: None,
            deprecated: false,
            deprecated_at: None,
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_released_by(mut self, who: impl Into<String>) -> Self {
        self.released_by = who.into();
        self
    }

    pub fn with_changelog(mut self, changelog: impl Into<String>) -> Self {
        self.changelog = changelog.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Structural validation.
    ///
    /// Reports the first offending field; artifacts are checked in order and
    /// name, URL, checksum in that order within each artifact.
    pub fn validate(&self) -> ChannelResult<()> {
        if self.version.is_empty() {
            return Err(ChannelError::validation("release version is required"));
        }

        if self.artifacts.is_empty() {
            return Err(ChannelError::validation(
                "release must have at least one artifact",
            ));
        }

        for (i, artifact) in self.artifacts.iter().enumerate() {
            if artifact.name.is_empty() {
                return Err(ChannelError::validation(format!(
                    "artifact {}: name is required",
                    i
                )));
            }
            if artifact.url.is_empty() {
                return Err(ChannelError::validation(format!(
                    "artifact {}: URL is required",
                    i
                )));
            }
            if artifact.checksum.is_empty() {
                return Err(ChannelError::validation(format!(
                    "artifact {}: checksum is required",
                    i
                )));
            }
        }

        Ok(())
    }

    /// Whether the release has outlived `retention_days` as of now
    pub fn is_expired(&self, retention_days: i64) -> bool {
        self.is_expired_at(retention_days, Utc::now())
    }

    /// Whether the release has outlived `retention_days` as of `now`.
    ///
    /// Non-positive retention never expires. A release exactly at its
    /// retention boundary is not yet expired.
    pub fn is_expired_at(&self, retention_days: i64, now: DateTime<Utc>) -> bool {
        if retention_days <= 0 {
            return false;
        }

        let expires_at = Duration::try_days(retention_days)
            .and_then(|window| self.published_at.checked_add_signed(window));

        match expires_at {
            Some(expires_at) => now > expires_at,
            // Window beyond the representable range
            None => false,
        }
    }

    /// First artifact built for the given platform and architecture
    pub fn get_artifact(&self, platform: &str, arch: &str) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.platform == platform && a.arch == arch)
    }

    /// Recency ordering used for "latest release" selection.
    ///
    /// Later `published_at` is newer; equal timestamps fall back to the
    /// lexicographically greater version string.
    pub fn cmp_recency(&self, other: &Release) -> Ordering {
        self.published_at
            .cmp(&other.published_at)
            .then_with(|| self.version.cmp(&other.version))
    }

    /// Copy of this release placed in `target` as the result of a promotion
    pub(crate) fn promoted_copy(
        &self,
        target: Channel,
        released_by: &str,
        promoted_at: DateTime<Utc>,
        published_at: DateTime<Utc>,
    ) -> Release {
        Release {
            version: self.version.clone(),
            channel: target,
            published_at,
            released_by: released_by.to_string(),
            changelog: self.changelog.clone(),
            artifacts: self.artifacts.clone(),
            dependencies: self.dependencies.clone(),
            metadata: self.metadata.clone(),
            promoted: true,
            promoted_from: Some(self.channel),
            promoted_at: Some(promoted_at),
            deprecated: false,
            deprecated_at: None,
        }
    }
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            checksum: checksum.into(),
            checksum_alg: "sha256".to_string(),
            ..Self::default()
        }
    }

    pub fn for_target(mut self, platform: impl Into<String>, arch: impl Into<String>) -> Self {
        self.platform = platform.into();
        self.arch = arch.into();
        self
    }

    pub fn with_checksum_alg(mut self, alg: impl Into<String>) -> Self {
        self.checksum_alg = alg.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}
