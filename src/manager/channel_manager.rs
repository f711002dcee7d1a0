//! # Channel Manager
//!
//! Orchestrates publish, promote, deprecate and retention cleanup over a
//! `ChannelStore`.
//!
//! A single reader/writer lock guards the config cache and the extension
//! lists. Mutating operations hold it exclusively for their whole duration,
//! store calls included, so two publishes of the same `(channel, version)`
//! cannot both succeed within one manager.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::channels::{
    Channel, ChannelConfig, ChannelError, ChannelResult, ChannelStats, PromotionRequest, Release,
};
use crate::observability::Event;
use crate::store::ChannelStore;

use super::extensions::{ReleaseHook, ReleaseValidator};
use super::report::CleanupReport;

#[derive(Default)]
struct ManagerState {
    configs: BTreeMap<Channel, ChannelConfig>,
    validators: Vec<Box<dyn ReleaseValidator>>,
    hooks: Vec<Box<dyn ReleaseHook>>,
}

/// Release lifecycle manager
pub struct ChannelManager {
    store: Arc<dyn ChannelStore>,
    /// Policies used instead of the built-in defaults at initialization
    seeds: BTreeMap<Channel, ChannelConfig>,
    state: RwLock<ManagerState>,
}

impl std::fmt::Debug for ChannelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelManager")
            .field("store", &self.store)
            .field("seeds", &self.seeds.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ChannelManager {
    /// Create a manager over `store`. Call `initialize` before use.
    pub fn new(store: Arc<dyn ChannelStore>) -> Self {
        Self {
            store,
            seeds: BTreeMap::new(),
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// Replace the built-in default policy for each channel named in `seeds`.
    ///
    /// Seeds only apply to channels with no persisted config.
    pub fn with_seed_configs(mut self, seeds: impl IntoIterator<Item = ChannelConfig>) -> Self {
        for seed in seeds {
            self.seeds.insert(seed.name, seed);
        }
        self
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ChannelStore> {
        &self.store
    }

    fn read_state(&self) -> ChannelResult<RwLockReadGuard<'_, ManagerState>> {
        self.state
            .read()
            .map_err(|_| ChannelError::Internal("Lock poisoned".into()))
    }

    fn write_state(&self) -> ChannelResult<RwLockWriteGuard<'_, ManagerState>> {
        self.state
            .write()
            .map_err(|_| ChannelError::Internal("Lock poisoned".into()))
    }

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Load or seed the policy for every channel.
    ///
    /// A persisted config always wins over the default; a default is written
    /// only when none exists. A config that exists but cannot be read is
    /// logged and replaced in the cache only. Fails only if persisting a new
    /// default fails.
    pub fn initialize(&self) -> ChannelResult<()> {
        let mut state = self.write_state()?;

        for channel in Channel::ALL {
            let config = match self.store.get_channel_config(channel) {
                Ok(existing) => {
                    tracing::debug!(event = %Event::ChannelConfigLoaded, channel = %channel);
                    existing
                }
                Err(e) if e.is_not_found() => {
                    let seed = self.seed_for(channel);
                    self.store.save_channel_config(&seed).map_err(|e| {
                        ChannelError::store(format!("failed to save config for {}", channel), e)
                    })?;
                    tracing::info!(event = %Event::ChannelConfigSeeded, channel = %channel);
                    seed
                }
                Err(e) => {
                    // Unreadable configs are left on disk untouched
                    tracing::warn!(
                        event = %Event::ChannelConfigUnreadable,
                        channel = %channel,
                        error = %e,
                        "using default policy in place of unreadable config"
                    );
                    self.seed_for(channel)
                }
            };
            state.configs.insert(channel, config);
        }

        tracing::info!(
            event = %Event::ManagerInitialized,
            channels = state.configs.len(),
            "channel manager initialized"
        );
        Ok(())
    }

    fn seed_for(&self, channel: Channel) -> ChannelConfig {
        self.seeds
            .get(&channel)
            .cloned()
            .unwrap_or_else(|| ChannelConfig::default_for(channel))
    }

    // =========================================================================
    // PUBLISH
    // =========================================================================

    /// Validate and persist a new release.
    ///
    /// Stamps `published_at` on the caller's release. Hook failures are
    /// logged and do not fail the publish.
    pub fn publish_release(&self, release: &mut Release) -> ChannelResult<()> {
        let state = self.write_state()?;

        release.validate()?;

        for validator in &state.validators {
            validator.validate(release).map_err(|e| match e {
                ChannelError::ValidationFailed(_) => e,
                other => ChannelError::validation(format!("{}: {}", validator.name(), other)),
            })?;
        }

        match self.store.get_release(release.channel, &release.version) {
            Ok(_) => {
                return Err(ChannelError::VersionAlreadyExists {
                    channel: release.channel,
                    version: release.version.clone(),
                })
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(ChannelError::store("failed to check existing release", e)),
        }

        release.published_at = Utc::now();

        self.store
            .save_release(release)
            .map_err(|e| ChannelError::store("failed to save release", e))?;

        let published: &Release = release;
        notify_hooks(&state.hooks, published, "on_publish", |hook| {
            hook.on_publish(published)
        });

        Ok(())
    }

    // =========================================================================
    // PROMOTE
    // =========================================================================

    /// Copy a release into a downstream channel after passing its gates.
    ///
    /// Gates, in order: promotion graph, source exists, target free, target
    /// policy known, required tests, approval. On success `approved_at` is
    /// stamped on the request and it is appended to the version's history;
    /// a history write failure is logged, not returned.
    pub fn promote_release(&self, request: &mut PromotionRequest) -> ChannelResult<Release> {
        let state = self.write_state()?;

        let from = request.from_channel;
        let to = request.to_channel;

        if request.version.is_empty() {
            return Err(ChannelError::InvalidArgument(
                "promotion request has no version".into(),
            ));
        }

        if !from.can_promote_to(to) {
            return Err(ChannelError::CannotPromote { from, to });
        }

        let source = match self.store.get_release(from, &request.version) {
            Ok(release) => release,
            Err(e) if e.is_not_found() => {
                return Err(ChannelError::ReleaseNotFound {
                    channel: from,
                    version: request.version.clone(),
                })
            }
            Err(e) => return Err(ChannelError::store("failed to get source release", e)),
        };

        match self.store.get_release(to, &request.version) {
            Ok(_) => {
                return Err(ChannelError::VersionAlreadyExists {
                    channel: to,
                    version: request.version.clone(),
                })
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(ChannelError::store("failed to check target release", e)),
        }

        let target_config = state
            .configs
            .get(&to)
            .ok_or(ChannelError::ChannelConfigNotFound(to))?;

        check_gates(target_config, request)?;

        let promoted =
            source.promoted_copy(to, &request.requested_by, request.requested_at, Utc::now());

        self.store
            .save_release(&promoted)
            .map_err(|e| ChannelError::store("failed to save promoted release", e))?;

        request.approved_at = Some(Utc::now());
        if let Err(e) = self.store.save_promotion_request(request) {
            tracing::warn!(
                event = %Event::PromotionHistoryWriteFailed,
                channel = %to,
                version = %request.version,
                error = %e,
                "failed to record promotion history"
            );
        }

        notify_hooks(&state.hooks, &promoted, "on_promote", |hook| {
            hook.on_promote(&promoted, from)
        });

        Ok(promoted)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// The most recently published release in `channel`.
    ///
    /// Equal publish times resolve to the greater version string.
    pub fn get_latest_release(&self, channel: Channel) -> ChannelResult<Release> {
        let _state = self.read_state()?;

        let mut releases = self
            .store
            .list_releases(channel)
            .map_err(|e| ChannelError::store("failed to list releases", e))?;

        releases.sort_by(|a, b| b.cmp_recency(a));
        releases
            .into_iter()
            .next()
            .ok_or(ChannelError::NoReleasesFound(channel))
    }

    /// Releases in `channel`, optionally including deprecated ones
    pub fn list_releases(
        &self,
        channel: Channel,
        include_deprecated: bool,
    ) -> ChannelResult<Vec<Release>> {
        let _state = self.read_state()?;

        let mut releases = self
            .store
            .list_releases(channel)
            .map_err(|e| ChannelError::store("failed to list releases", e))?;

        if !include_deprecated {
            releases.retain(|r| !r.deprecated);
        }
        Ok(releases)
    }

    /// Release count and newest release of `channel`
    pub fn get_channel_stats(&self, channel: Channel) -> ChannelResult<ChannelStats> {
        let _state = self.read_state()?;

        let releases = self
            .store
            .list_releases(channel)
            .map_err(|e| ChannelError::store("failed to list releases", e))?;

        Ok(ChannelStats::from_releases(channel, &releases))
    }

    /// Promotion attempts recorded for `version`, oldest first
    pub fn get_promotion_history(&self, version: &str) -> ChannelResult<Vec<PromotionRequest>> {
        let _state = self.read_state()?;

        self.store
            .get_promotion_history(version)
            .map_err(|e| ChannelError::store("failed to get promotion history", e))
    }

    /// The cached policy for `channel`
    pub fn channel_config(&self, channel: Channel) -> ChannelResult<ChannelConfig> {
        let state = self.read_state()?;
        state
            .configs
            .get(&channel)
            .cloned()
            .ok_or(ChannelError::ChannelConfigNotFound(channel))
    }

    // =========================================================================
    // DEPRECATE / CLEANUP
    // =========================================================================

    /// Mark a release deprecated. Deprecation is terminal.
    pub fn deprecate_release(&self, channel: Channel, version: &str) -> ChannelResult<Release> {
        let state = self.write_state()?;

        let mut release = match self.store.get_release(channel, version) {
            Ok(release) => release,
            Err(e) if e.is_not_found() => {
                return Err(ChannelError::ReleaseNotFound {
                    channel,
                    version: version.to_string(),
                })
            }
            Err(e) => return Err(ChannelError::store("failed to get release", e)),
        };

        if release.deprecated {
            return Err(ChannelError::AlreadyDeprecated {
                channel,
                version: version.to_string(),
            });
        }

        release.deprecated = true;
        release.deprecated_at = Some(Utc::now());

        self.store
            .save_release(&release)
            .map_err(|e| ChannelError::store("failed to save deprecated release", e))?;

        notify_hooks(&state.hooks, &release, "on_deprecate", |hook| {
            hook.on_deprecate(&release)
        });

        Ok(release)
    }

    /// Delete every release older than its channel's retention window.
    ///
    /// Every channel is visited even after a failure; any listing or delete
    /// failure turns the whole sweep into `CleanupFailed`.
    pub fn cleanup_expired_releases(&self) -> ChannelResult<CleanupReport> {
        let state = self.write_state()?;
        let now = Utc::now();

        tracing::info!(event = %Event::CleanupStart, channels = state.configs.len());

        let mut report = CleanupReport::default();
        let mut errors: Vec<String> = Vec::new();

        for (channel, config) in &state.configs {
            let releases = match self.store.list_releases(*channel) {
                Ok(releases) => releases,
                Err(e) => {
                    tracing::warn!(
                        event = %Event::CleanupStepFailed,
                        channel = %channel,
                        error = %e,
                        "failed to list releases"
                    );
                    errors.push(format!("failed to list releases for {}: {}", channel, e));
                    continue;
                }
            };

            for release in releases
                .iter()
                .filter(|r| r.is_expired_at(config.retention_days, now))
            {
                match self.store.delete_release(*channel, &release.version) {
                    Ok(()) => {
                        tracing::info!(
                            event = %Event::ReleaseExpired,
                            channel = %channel,
                            version = %release.version,
                            retention_days = config.retention_days
                        );
                        report.removed.push((*channel, release.version.clone()));
                    }
                    Err(e) => {
                        tracing::warn!(
                            event = %Event::CleanupStepFailed,
                            channel = %channel,
                            version = %release.version,
                            error = %e,
                            "failed to delete expired release"
                        );
                        errors.push(format!(
                            "failed to delete {}/{}: {}",
                            channel, release.version, e
                        ));
                    }
                }
            }
        }

        tracing::info!(
            event = %Event::CleanupComplete,
            removed = report.len(),
            errors = errors.len()
        );

        let count = errors.len();
        match errors.into_iter().next() {
            None => Ok(report),
            Some(first) => Err(ChannelError::CleanupFailed { count, first }),
        }
    }

    // =========================================================================
    // EXTENSIONS
    // =========================================================================

    /// Append a pre-publish validator
    pub fn add_validator(&self, validator: impl ReleaseValidator + 'static) -> ChannelResult<()> {
        let mut state = self.write_state()?;
        state.validators.push(Box::new(validator));
        Ok(())
    }

    /// Append a lifecycle hook
    pub fn add_hook(&self, hook: impl ReleaseHook + 'static) -> ChannelResult<()> {
        let mut state = self.write_state()?;
        state.hooks.push(Box::new(hook));
        Ok(())
    }
}

/// Required tests, then approval, for a promotion into `target`
fn check_gates(target: &ChannelConfig, request: &PromotionRequest) -> ChannelResult<()> {
    if !target.required_tests.is_empty() {
        if request.test_results.is_empty() {
            return Err(ChannelError::TestResultsRequired {
                channel: target.name,
            });
        }

        if let Some(missing) = target
            .required_tests
            .iter()
            .find(|test| !request.has_passed(test))
        {
            return Err(ChannelError::TestFailed {
                channel: target.name,
                test: missing.clone(),
            });
        }
    }

    if target.requires_approval() && request.approver().is_none() {
        return Err(ChannelError::ApprovalRequired {
            channel: target.name,
        });
    }

    Ok(())
}

/// Run one callback on every hook; failures are logged and dropped
fn notify_hooks<F>(hooks: &[Box<dyn ReleaseHook>], release: &Release, callback: &str, call: F)
where
    F: Fn(&dyn ReleaseHook) -> ChannelResult<()>,
{
    for hook in hooks {
        if let Err(e) = call(hook.as_ref()) {
            tracing::warn!(
                event = %Event::HookFailed,
                hook = hook.name(),
                callback,
                channel = %release.channel,
                version = %release.version,
                error = %e,
                "hook failed"
            );
        }
    }
}
