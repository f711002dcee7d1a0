//! # Channel Store
//!
//! Persistence for releases, channel policies, and promotion history behind
//! the `ChannelStore` trait, with a file-backed and an in-memory
//! implementation.

pub mod errors;
pub mod backend;
pub mod paths;
pub mod index;
pub mod file;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use backend::ChannelStore;
pub use paths::sanitize_version;
pub use index::IndexEntry;
pub use file::FileStore;
pub use memory::MemoryStore;
