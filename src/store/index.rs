//! # Channel Index
//!
//! Denormalized per-channel summary rewritten after every save and delete so
//! a channel can be listed without opening each release document.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::channels::Release;

/// One line of a channel index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub version: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub published_at: String,
    pub deprecated: bool,
}

impl IndexEntry {
    pub fn from_release(release: &Release) -> Self {
        Self {
            version: release.version.clone(),
            published_at: release
                .published_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            deprecated: release.deprecated,
        }
    }
}

/// Build an index sorted by version for stable output
pub fn build_index(releases: &[Release]) -> Vec<IndexEntry> {
    let mut entries: Vec<IndexEntry> = releases.iter().map(IndexEntry::from_release).collect();
    entries.sort_by(|a, b| a.version.cmp(&b.version));
    entries
}
