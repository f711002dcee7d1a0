//! Publish and deprecate lifecycle tests

mod common;

use common::*;
use release_channels::manager::{LoggingHook, SemverValidator};
use release_channels::{
    Channel, ChannelError, ChannelResult, ChannelStore, Release, ReleaseHook, ReleaseValidator,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

// =============================================================================
// Test Utilities
// =============================================================================

struct FailingHook;

impl ReleaseHook for FailingHook {
    fn name(&self) -> &str {
        "webhook"
    }

    fn on_publish(&self, _release: &Release) -> ChannelResult<()> {
        Err(ChannelError::Internal("webhook endpoint unreachable".into()))
    }

    fn on_promote(&self, _release: &Release, _from: Channel) -> ChannelResult<()> {
        Err(ChannelError::Internal("webhook endpoint unreachable".into()))
    }

    fn on_deprecate(&self, _release: &Release) -> ChannelResult<()> {
        Err(ChannelError::Internal("webhook endpoint unreachable".into()))
    }
}

/// Rejects versions carrying a forbidden suffix
struct NoSnapshots;

impl ReleaseValidator for NoSnapshots {
    fn name(&self) -> &str {
        "no-snapshots"
    }

    fn validate(&self, release: &Release) -> ChannelResult<()> {
        if release.version.ends_with("-SNAPSHOT") {
            return Err(ChannelError::validation("snapshot builds are not publishable"));
        }
        Ok(())
    }
}

struct CountingValidator(Arc<AtomicUsize>);

impl ReleaseValidator for CountingValidator {
    fn name(&self) -> &str {
        "counting"
    }

    fn validate(&self, _release: &Release) -> ChannelResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Publish
// =============================================================================

#[test]
fn test_duplicate_publish_rejected() {
    let (store, manager) = memory_manager();

    let mut first = release("1.0.0", Channel::Edge);
    manager.publish_release(&mut first).unwrap();

    let mut second = release("1.0.0", Channel::Edge).with_changelog("different");
    let err = manager.publish_release(&mut second).unwrap_err();
    assert!(matches!(
        err,
        ChannelError::VersionAlreadyExists { channel: Channel::Edge, ref version } if version == "1.0.0"
    ));

    // First write is the one kept
    assert_eq!(store.get_release(Channel::Edge, "1.0.0").unwrap(), first);
}

#[test]
fn test_same_version_in_different_channels() {
    let (_store, manager) = memory_manager();
    manager
        .publish_release(&mut release("1.0.0", Channel::Edge))
        .unwrap();
    manager
        .publish_release(&mut release("1.0.0", Channel::Nightly))
        .unwrap();
}

#[test]
fn test_concurrent_duplicate_publish_admits_one() {
    let (_store, manager) = memory_manager();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| manager.publish_release(&mut release("7.0.0", Channel::Beta)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ChannelError::VersionAlreadyExists { .. })));
}

#[test]
fn test_structural_validation_reports_first_failure() {
    let (_store, manager) = memory_manager();

    let mut r = release("1.0.0", Channel::Edge);
    r.artifacts.push(r.artifacts[0].clone());
    r.artifacts[1].url.clear();
    r.artifacts[1].checksum.clear();

    let err = manager.publish_release(&mut r).unwrap_err();
    assert_eq!(err.to_string(), "validation failed: artifact 1: URL is required");
}

#[test]
fn test_custom_validator_stops_publish() {
    let (_store, manager) = memory_manager();
    let calls = Arc::new(AtomicUsize::new(0));
    manager.add_validator(NoSnapshots).unwrap();
    manager
        .add_validator(CountingValidator(Arc::clone(&calls)))
        .unwrap();

    let mut snapshot = release("1.1.0-SNAPSHOT", Channel::Edge);
    let err = manager.publish_release(&mut snapshot).unwrap_err();
    assert!(matches!(err, ChannelError::ValidationFailed(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(manager.list_releases(Channel::Edge, true).unwrap().is_empty());

    manager
        .publish_release(&mut release("1.1.0", Channel::Edge))
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_semver_validator_through_manager() {
    let (_store, manager) = memory_manager();
    manager.add_validator(SemverValidator).unwrap();

    let err = manager
        .publish_release(&mut release("build-1234", Channel::Nightly))
        .unwrap_err();
    assert_eq!(err.code(), "CHANNEL_VALIDATION_FAILED");
}

#[test]
fn test_hook_failure_does_not_fail_publish() {
    let (store, manager) = memory_manager();
    manager.add_hook(FailingHook).unwrap();
    manager.add_hook(LoggingHook).unwrap();

    let mut r = release("2.1.0", Channel::Beta);
    manager.publish_release(&mut r).unwrap();

    assert_eq!(store.get_release(Channel::Beta, "2.1.0").unwrap(), r);
    assert_eq!(manager.get_latest_release(Channel::Beta).unwrap(), r);
}

// =============================================================================
// Deprecate
// =============================================================================

#[test]
fn test_deprecate_twice() {
    let (store, manager) = memory_manager();
    manager
        .publish_release(&mut release("1.0.0", Channel::Stable))
        .unwrap();

    let deprecated = manager.deprecate_release(Channel::Stable, "1.0.0").unwrap();
    assert!(deprecated.deprecated);
    let deprecated_at = deprecated.deprecated_at.expect("deprecated_at set");

    let stored = store.get_release(Channel::Stable, "1.0.0").unwrap();
    assert!(stored.deprecated);
    assert_eq!(stored.deprecated_at, Some(deprecated_at));

    let err = manager
        .deprecate_release(Channel::Stable, "1.0.0")
        .unwrap_err();
    assert!(matches!(err, ChannelError::AlreadyDeprecated { .. }));

    // Timestamp unchanged by the rejected call
    let stored = store.get_release(Channel::Stable, "1.0.0").unwrap();
    assert_eq!(stored.deprecated_at, Some(deprecated_at));
}

#[test]
fn test_deprecate_missing_release() {
    let (_store, manager) = memory_manager();
    let err = manager.deprecate_release(Channel::Lts, "0.0.1").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, ChannelError::ReleaseNotFound { channel: Channel::Lts, .. }));
}

#[test]
fn test_deprecate_with_failing_hook() {
    let (_store, manager) = memory_manager();
    manager.add_hook(FailingHook).unwrap();
    manager
        .publish_release(&mut release("1.0.0", Channel::Edge))
        .unwrap();

    manager.deprecate_release(Channel::Edge, "1.0.0").unwrap();
    assert!(manager.list_releases(Channel::Edge, false).unwrap().is_empty());
    assert_eq!(manager.list_releases(Channel::Edge, true).unwrap().len(), 1);
}

#[test]
fn test_promote_with_failing_hook() {
    let (store, manager) = memory_manager();
    manager.add_hook(FailingHook).unwrap();
    manager
        .publish_release(&mut release("1.0.0", Channel::Edge))
        .unwrap();

    let mut request = request_with_tests("1.0.0", Channel::Edge, Channel::Nightly, &[]);
    let promoted = manager.promote_release(&mut request).unwrap();

    assert_eq!(store.get_release(Channel::Nightly, "1.0.0").unwrap(), promoted);
    assert_eq!(manager.get_promotion_history("1.0.0").unwrap().len(), 1);
}
