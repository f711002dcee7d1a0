//! # Channel Policies
//!
//! Per-channel promotion policy: retention window, tests that must pass
//! before a release may enter the channel, and who must approve it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::channel::Channel;

/// Test statuses that satisfy a promotion gate
pub const PASSING_STATUSES: [&str; 2] = ["passed", "success"];

/// Policy record for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: Channel,
    #[serde(default)]
    pub description: String,
    /// Informational; the promotion graph itself is fixed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotion_path: Vec<Channel>,
    /// Non-positive means releases never expire
    pub retention_days: i64,
    /// Reserved for automated promotion; not consulted by the manager
    #[serde(default)]
    pub auto_promotion: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_tests: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approvers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ChannelConfig {
    /// Minimal policy using the channel's default retention
    pub fn new(name: Channel) -> Self {
        Self {
            name,
            description: String::new(),
            promotion_path: Vec::new(),
            retention_days: name.default_retention(),
            auto_promotion: false,
            required_tests: Vec::new(),
            approvers: Vec::new(),
            webhook_url: None,
            metadata: BTreeMap::new(),
        }
    }

    /// The built-in policy seeded for `channel` on first initialization
    pub fn default_for(channel: Channel) -> Self {
        let (description, promotion_path, required_tests) = match channel {
            Channel::Edge => (
                "Cutting-edge development builds",
                vec![Channel::Beta, Channel::Nightly],
                vec![],
            ),
            Channel::Nightly => ("Automated nightly builds", vec![Channel::Beta], vec![]),
            Channel::Beta => (
                "Pre-release testing builds",
                vec![Channel::Stable],
                vec!["unit", "integration", "smoke"],
            ),
            Channel::Stable => (
                "Production-ready releases",
                vec![Channel::Lts],
                vec!["unit", "integration", "smoke", "performance", "security"],
            ),
            Channel::Lts => (
                "Long-term support releases",
                vec![],
                vec![
                    "unit",
                    "integration",
                    "smoke",
                    "performance",
                    "security",
                    "compatibility",
                ],
            ),
        };

        Self {
            description: description.to_string(),
            promotion_path,
            required_tests: required_tests.into_iter().map(String::from).collect(),
            ..Self::new(channel)
        }
    }

    /// Default policies for every channel, in graph order
    pub fn defaults() -> Vec<ChannelConfig> {
        Channel::ALL.into_iter().map(Self::default_for).collect()
    }

    pub fn with_required_tests<I, S>(mut self, tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tests = tests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_approvers<I, S>(mut self, approvers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.approvers = approvers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// Whether promotion into this channel needs a named approver
    pub fn requires_approval(&self) -> bool {
        !self.approvers.is_empty()
    }
}
