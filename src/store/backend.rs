//! # Channel Store Trait

use super::errors::StoreResult;
use crate::channels::{Channel, ChannelConfig, PromotionRequest, Release};

/// Durable storage for releases, channel policies, and promotion history.
///
/// Missing releases and configs are reported as `StoreError::NotFound`;
/// listings of empty channels and histories of unknown versions are empty,
/// not errors.
pub trait ChannelStore: Send + Sync + std::fmt::Debug {
    /// Fetch the release `version` in `channel`
    fn get_release(&self, channel: Channel, version: &str) -> StoreResult<Release>;

    /// All releases in `channel`, in no particular order
    fn list_releases(&self, channel: Channel) -> StoreResult<Vec<Release>>;

    /// Insert or replace a release; rejects structurally invalid releases
    fn save_release(&self, release: &Release) -> StoreResult<()>;

    /// Remove a release
    fn delete_release(&self, channel: Channel, version: &str) -> StoreResult<()>;

    /// Fetch the persisted policy for `channel`
    fn get_channel_config(&self, channel: Channel) -> StoreResult<ChannelConfig>;

    /// Insert or replace a channel policy
    fn save_channel_config(&self, config: &ChannelConfig) -> StoreResult<()>;

    /// Promotion attempts recorded for `version`, oldest first
    fn get_promotion_history(&self, version: &str) -> StoreResult<Vec<PromotionRequest>>;

    /// Append a promotion attempt to the history of its version
    fn save_promotion_request(&self, request: &PromotionRequest) -> StoreResult<()>;
}
