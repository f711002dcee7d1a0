//! # Observability
//!
//! Logging goes through the `tracing` facade; this crate never installs a
//! subscriber. Each record carries an `event` field naming an [`Event`] plus
//! the channel and version it concerns.

mod events;

pub use events::Event;
