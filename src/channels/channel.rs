//! # Release Channels
//!
//! The five distribution channels and the fixed promotion graph between them:
//!
//! ```text
//! edge    -> beta, nightly
//! nightly -> beta
//! beta    -> stable, lts
//! stable  -> lts
//! lts     -> (none)
//! ```
//!
//! The graph is acyclic with `lts` as its only sink.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ChannelError;

/// Retention applied when a channel has no explicit policy
pub const FALLBACK_RETENTION_DAYS: i64 = 30;

/// A release distribution channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Cutting-edge development builds
    Edge,
    /// Automated nightly builds
    Nightly,
    /// Pre-release testing
    Beta,
    /// Production-ready releases
    Stable,
    /// Long-term support releases
    Lts,
}

impl Channel {
    /// Every channel, in promotion-graph order
    pub const ALL: [Channel; 5] = [
        Channel::Edge,
        Channel::Nightly,
        Channel::Beta,
        Channel::Stable,
        Channel::Lts,
    ];

    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Edge => "edge",
            Channel::Nightly => "nightly",
            Channel::Beta => "beta",
            Channel::Stable => "stable",
            Channel::Lts => "lts",
        }
    }

    /// Whether `name` is one of the five channel names
    pub fn is_valid(name: &str) -> bool {
        name.parse::<Channel>().is_ok()
    }

    /// Channels a release in this channel may be promoted into
    pub fn promotion_targets(&self) -> &'static [Channel] {
        match self {
            Channel::Edge => &[Channel::Beta, Channel::Nightly],
            Channel::Nightly => &[Channel::Beta],
            Channel::Beta => &[Channel::Stable, Channel::Lts],
            Channel::Stable => &[Channel::Lts],
            Channel::Lts => &[],
        }
    }

    /// Whether a release may be promoted from this channel into `target`
    pub fn can_promote_to(&self, target: Channel) -> bool {
        self.promotion_targets().contains(&target)
    }

    /// Default retention period in days
    pub fn default_retention(&self) -> i64 {
        match self {
            Channel::Edge => 7,
            Channel::Nightly => 14,
            Channel::Beta => 30,
            Channel::Stable => 365,
            Channel::Lts => 1825,
        }
    }
}

/// Default retention for a channel given by name; unknown names get 30 days.
pub fn default_retention_for(name: &str) -> i64 {
    name.parse::<Channel>()
        .map(|c| c.default_retention())
        .unwrap_or(FALLBACK_RETENTION_DAYS)
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edge" => Ok(Channel::Edge),
            "nightly" => Ok(Channel::Nightly),
            "beta" => Ok(Channel::Beta),
            "stable" => Ok(Channel::Stable),
            "lts" => Ok(Channel::Lts),
            other => Err(ChannelError::InvalidChannel(other.to_string())),
        }
    }
}
