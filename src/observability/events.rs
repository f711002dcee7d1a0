//! Lifecycle events for release channels
//!
//! Every log line the crate emits names one of these events in its `event`
//! field so log consumers can match on a stable identifier rather than on
//! message text.

use std::fmt;

/// Observable events in the channel lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Manager lifecycle
    /// Manager finished loading channel policies
    ManagerInitialized,
    /// A default policy was persisted for a channel
    ChannelConfigSeeded,
    /// An existing persisted policy was loaded for a channel
    ChannelConfigLoaded,
    /// A persisted policy exists but could not be read
    ChannelConfigUnreadable,

    // Release lifecycle
    /// Release published into a channel
    ReleasePublished,
    /// Release copied into a downstream channel
    ReleasePromoted,
    /// Release marked deprecated
    ReleaseDeprecated,
    /// Release removed after its retention window
    ReleaseExpired,

    // Cleanup
    /// Retention sweep started
    CleanupStart,
    /// Retention sweep finished
    CleanupComplete,
    /// Retention sweep hit a listing or delete failure
    CleanupStepFailed,

    // Non-fatal failures
    /// A hook callback returned an error
    HookFailed,
    /// A promotion succeeded but its history entry was not written
    PromotionHistoryWriteFailed,
    /// A channel index could not be rewritten
    IndexUpdateFailed,
    /// A release document could not be read during a listing
    ReleaseFileSkipped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ManagerInitialized => "MANAGER_INITIALIZED",
            Event::ChannelConfigSeeded => "CHANNEL_CONFIG_SEEDED",
            Event::ChannelConfigLoaded => "CHANNEL_CONFIG_LOADED",
            Event::ChannelConfigUnreadable => "CHANNEL_CONFIG_UNREADABLE",

            Event::ReleasePublished => "RELEASE_PUBLISHED",
            Event::ReleasePromoted => "RELEASE_PROMOTED",
            Event::ReleaseDeprecated => "RELEASE_DEPRECATED",
            Event::ReleaseExpired => "RELEASE_EXPIRED",

            Event::CleanupStart => "CLEANUP_START",
            Event::CleanupComplete => "CLEANUP_COMPLETE",
            Event::CleanupStepFailed => "CLEANUP_STEP_FAILED",

            Event::HookFailed => "HOOK_FAILED",
            Event::PromotionHistoryWriteFailed => "PROMOTION_HISTORY_WRITE_FAILED",
            Event::IndexUpdateFailed => "INDEX_UPDATE_FAILED",
            Event::ReleaseFileSkipped => "RELEASE_FILE_SKIPPED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ManagerInitialized,
            Event::ChannelConfigSeeded,
            Event::ChannelConfigLoaded,
            Event::ChannelConfigUnreadable,
            Event::ReleasePublished,
            Event::ReleasePromoted,
            Event::ReleaseDeprecated,
            Event::ReleaseExpired,
            Event::CleanupStart,
            Event::CleanupComplete,
            Event::CleanupStepFailed,
            Event::HookFailed,
            Event::PromotionHistoryWriteFailed,
            Event::IndexUpdateFailed,
            Event::ReleaseFileSkipped,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::ReleasePromoted), "RELEASE_PROMOTED");
        assert_eq!(format!("{}", Event::CleanupStart), "CLEANUP_START");
    }
}
