//! # Manager Extensions
//!
//! Capability traits for pluggable pre-publish checks and post-event
//! callbacks. Both run in registration order.

use crate::channels::{Channel, ChannelResult, Release};

/// Pre-publish check run after structural validation.
///
/// The first validator to return an error aborts the publish; its message is
/// reported as `ChannelError::ValidationFailed`.
pub trait ReleaseValidator: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Check a release about to be published
    fn validate(&self, release: &Release) -> ChannelResult<()>;
}

/// Callback invoked after a lifecycle event has been persisted.
///
/// Errors are logged and discarded; they never fail the operation.
pub trait ReleaseHook: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn on_publish(&self, _release: &Release) -> ChannelResult<()> {
        Ok(())
    }

    /// `release` is the new copy in the target channel
    fn on_promote(&self, _release: &Release, _from: Channel) -> ChannelResult<()> {
        Ok(())
    }

    fn on_deprecate(&self, _release: &Release) -> ChannelResult<()> {
        Ok(())
    }
}
