//! # Promotion Requests
//!
//! A promotion request records one attempt to copy a release into a
//! downstream channel, together with the test evidence gating it. History is
//! append-only per version.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::policy::PASSING_STATUSES;

/// A request to promote `version` from one channel to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRequest {
    pub version: String,
    pub from_channel: Channel,
    pub to_channel: Channel,
    #[serde(default)]
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// Stamped by the manager when the promotion commits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Outcome of one test run offered as promotion evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: String,
    /// Milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    pub run_at: DateTime<Utc>,
}

impl PromotionRequest {
    pub fn new(
        version: impl Into<String>,
        from_channel: Channel,
        to_channel: Channel,
        requested_by: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            from_channel,
            to_channel,
            requested_by: requested_by.into(),
            requested_at: Utc::now(),
            approved_by: None,
            approved_at: None,
            test_results: Vec::new(),
            notes: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_approver(mut self, approver: impl Into<String>) -> Self {
        self.approved_by = Some(approver.into());
        self
    }

    pub fn with_test_result(mut self, result: TestResult) -> Self {
        self.test_results.push(result);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Approver identity, if a non-empty one was supplied
    pub fn approver(&self) -> Option<&str> {
        self.approved_by.as_deref().filter(|a| !a.is_empty())
    }

    /// Whether a passing result for `test` is present
    pub fn has_passed(&self, test: &str) -> bool {
        self.test_results
            .iter()
            .any(|r| r.name == test && r.is_passing())
    }
}

impl TestResult {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            duration: 0,
            output: String::new(),
            run_at: Utc::now(),
        }
    }

    pub fn passed(name: impl Into<String>) -> Self {
        Self::new(name, "passed")
    }

    pub fn failed(name: impl Into<String>) -> Self {
        Self::new(name, "failed")
    }

    pub fn with_duration(mut self, millis: u64) -> Self {
        self.duration = millis;
        self
    }

    /// Only "passed" and "success" satisfy a gate
    pub fn is_passing(&self) -> bool {
        PASSING_STATUSES.contains(&self.status.as_str())
    }
}
