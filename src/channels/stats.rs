//! # Channel Statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::release::Release;

/// Read-only summary of a channel.
///
/// Download counters are not tracked here and stay zero unless filled in by a
/// telemetry source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel: Channel,
    pub total_releases: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_release: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_downloads: u64,
    #[serde(default)]
    pub total_downloads: u64,
}

impl ChannelStats {
    /// Summarize `releases` with a single pass for the newest entry
    pub fn from_releases(channel: Channel, releases: &[Release]) -> Self {
        let mut latest: Option<&Release> = None;
        for release in releases {
            match latest {
                Some(current) if !release.cmp_recency(current).is_gt() => {}
                _ => latest = Some(release),
            }
        }

        Self {
            channel,
            total_releases: releases.len(),
            latest_version: latest.map(|r| r.version.clone()),
            latest_release: latest.map(|r| r.published_at),
            active_downloads: 0,
            total_downloads: 0,
        }
    }
}
