//! # Built-in Hooks

use crate::channels::{Channel, ChannelResult, Release};
use crate::observability::Event;

use super::extensions::ReleaseHook;

/// Emits one INFO record per lifecycle callback
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook;

impl ReleaseHook for LoggingHook {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_publish(&self, release: &Release) -> ChannelResult<()> {
        tracing::info!(
            event = %Event::ReleasePublished,
            channel = %release.channel,
            version = %release.version,
            artifacts = release.artifacts.len(),
            "release published"
        );
        Ok(())
    }

    fn on_promote(&self, release: &Release, from: Channel) -> ChannelResult<()> {
        tracing::info!(
            event = %Event::ReleasePromoted,
            from = %from,
            channel = %release.channel,
            version = %release.version,
            released_by = %release.released_by,
            "release promoted"
        );
        Ok(())
    }

    fn on_deprecate(&self, release: &Release) -> ChannelResult<()> {
        tracing::info!(
            event = %Event::ReleaseDeprecated,
            channel = %release.channel,
            version = %release.version,
            "release deprecated"
        );
        Ok(())
    }
}
