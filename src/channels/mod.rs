//! # Release Channels
//!
//! Value types for the channel graph: channels, releases and their artifacts,
//! per-channel policy, promotion requests, and derived statistics.

pub mod errors;
pub mod channel;
pub mod release;
pub mod policy;
pub mod promotion;
pub mod stats;

pub use errors::{ChannelError, ChannelResult};
pub use channel::{default_retention_for, Channel, FALLBACK_RETENTION_DAYS};
pub use release::{Artifact, Dependency, Release};
pub use policy::{ChannelConfig, PASSING_STATUSES};
pub use promotion::{PromotionRequest, TestResult};
pub use stats::ChannelStats;
