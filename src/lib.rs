//! release-channels - policy-driven release promotion across distribution
//! channels
//!
//! Releases are published into one of five channels (edge, nightly, beta,
//! stable, lts), promoted along a fixed graph once their target channel's
//! required tests and approvals are satisfied, deprecated, and finally expired
//! by per-channel retention.

pub mod channels;
pub mod config;
pub mod manager;
pub mod observability;
pub mod store;

pub use channels::{
    Artifact, Channel, ChannelConfig, ChannelError, ChannelResult, ChannelStats, Dependency,
    PromotionRequest, Release, TestResult,
};
pub use config::{Config, ConfigError};
pub use manager::{ChannelManager, CleanupReport, ReleaseHook, ReleaseValidator};
pub use store::{ChannelStore, FileStore, MemoryStore, StoreError};
