//! # Channel Errors
//!
//! One variant per failure kind the channel manager can report. Variants carry
//! the channel, version, or test name involved so callers can match on them
//! without parsing messages.

use thiserror::Error;

use super::channel::Channel;
use crate::store::StoreError;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Channel management errors
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("invalid channel: {0}")]
    InvalidChannel(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("version {version} already exists in channel {channel}")]
    VersionAlreadyExists { channel: Channel, version: String },

    #[error("release {version} not found in channel {channel}")]
    ReleaseNotFound { channel: Channel, version: String },

    #[error("channel config not found: {0}")]
    ChannelConfigNotFound(Channel),

    #[error("cannot promote from {from} to {to}")]
    CannotPromote { from: Channel, to: Channel },

    #[error("test results required for promotion to {channel}")]
    TestResultsRequired { channel: Channel },

    #[error("required test not passed: {test}")]
    TestFailed { channel: Channel, test: String },

    #[error("approval required for promotion to {channel}")]
    ApprovalRequired { channel: Channel },

    #[error("release {version} in channel {channel} is already deprecated")]
    AlreadyDeprecated { channel: Channel, version: String },

    #[error("no releases found in channel {0}")]
    NoReleasesFound(Channel),

    #[error("cleanup failed with {count} errors, first: {first}")]
    CleanupFailed { count: usize, first: String },

    #[error("{operation}: {source}")]
    Store {
        operation: String,
        #[source]
        source: StoreError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChannelError {
    /// Build a validation error from any message
    pub fn validation(reason: impl Into<String>) -> Self {
        ChannelError::ValidationFailed(reason.into())
    }

    /// Wrap a store failure with the operation that triggered it
    pub fn store(operation: impl Into<String>, source: StoreError) -> Self {
        ChannelError::Store {
            operation: operation.into(),
            source,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ChannelError::InvalidChannel(_) => "CHANNEL_INVALID",
            ChannelError::InvalidArgument(_) => "CHANNEL_INVALID_ARGUMENT",
            ChannelError::ValidationFailed(_) => "CHANNEL_VALIDATION_FAILED",
            ChannelError::VersionAlreadyExists { .. } => "CHANNEL_VERSION_EXISTS",
            ChannelError::ReleaseNotFound { .. } => "CHANNEL_RELEASE_NOT_FOUND",
            ChannelError::ChannelConfigNotFound(_) => "CHANNEL_CONFIG_NOT_FOUND",
            ChannelError::CannotPromote { .. } => "CHANNEL_CANNOT_PROMOTE",
            ChannelError::TestResultsRequired { .. } => "CHANNEL_TEST_RESULTS_REQUIRED",
            ChannelError::TestFailed { .. } => "CHANNEL_TEST_FAILED",
            ChannelError::ApprovalRequired { .. } => "CHANNEL_APPROVAL_REQUIRED",
            ChannelError::AlreadyDeprecated { .. } => "CHANNEL_ALREADY_DEPRECATED",
            ChannelError::NoReleasesFound(_) => "CHANNEL_NO_RELEASES",
            ChannelError::CleanupFailed { .. } => "CHANNEL_CLEANUP_FAILED",
            ChannelError::Store { .. } => "CHANNEL_STORE_ERROR",
            ChannelError::Internal(_) => "CHANNEL_INTERNAL",
        }
    }

    /// True for errors that mean "the thing asked for does not exist"
    pub fn is_not_found(&self) -> bool {
        match self {
            ChannelError::ReleaseNotFound { .. }
            | ChannelError::ChannelConfigNotFound(_)
            | ChannelError::NoReleasesFound(_) => true,
            ChannelError::Store { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            ChannelError::NoReleasesFound(Channel::Edge).code(),
            "CHANNEL_NO_RELEASES"
        );
        assert_eq!(
            ChannelError::CannotPromote {
                from: Channel::Stable,
                to: Channel::Beta
            }
            .code(),
            "CHANNEL_CANNOT_PROMOTE"
        );
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ChannelError::TestFailed {
            channel: Channel::Stable,
            test: "security".into(),
        };
        assert_eq!(err.to_string(), "required test not passed: security");

        let err = ChannelError::VersionAlreadyExists {
            channel: Channel::Beta,
            version: "1.2.0".into(),
        };
        assert_eq!(err.to_string(), "version 1.2.0 already exists in channel beta");
    }

    #[test]
    fn test_is_not_found() {
        assert!(ChannelError::ReleaseNotFound {
            channel: Channel::Edge,
            version: "1.0.0".into()
        }
        .is_not_found());
        assert!(ChannelError::store(
            "failed to get release",
            StoreError::NotFound("releases/edge/1.0.0.json".into())
        )
        .is_not_found());
        assert!(!ChannelError::ApprovalRequired {
            channel: Channel::Lts
        }
        .is_not_found());
    }
}
