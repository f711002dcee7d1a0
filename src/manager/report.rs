//! # Cleanup Report

use crate::channels::Channel;

/// Releases removed by one retention sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// `(channel, version)` of every deleted release, in sweep order
    pub removed: Vec<(Channel, String)>,
}

impl CleanupReport {
    pub fn len(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    /// Whether `version` was removed from `channel`
    pub fn contains(&self, channel: Channel, version: &str) -> bool {
        self.removed
            .iter()
            .any(|(c, v)| *c == channel && v == version)
    }
}
