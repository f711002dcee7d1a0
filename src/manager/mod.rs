//! # Channel Manager
//!
//! The release lifecycle orchestrator and its extension points.

pub mod extensions;
pub mod validators;
pub mod hooks;
pub mod report;
pub mod channel_manager;

pub use extensions::{ReleaseHook, ReleaseValidator};
pub use validators::{ChecksumValidator, SemverValidator};
pub use hooks::LoggingHook;
pub use report::CleanupReport;
pub use channel_manager::ChannelManager;
