use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::ActionRegistry;
use crate::config::Config;
use crate::error::{CacheError, RuleError};
use crate::models::{Notification, Notifications, RefreshStrategy};
use crate::remote::RemoteSource;
use crate::rules::{apply_with_report, ApplyReport, Rule};
use crate::store::{load_notifications, save_notifications, sync_with_report, Cache, FileCache, SyncReport};

/// Owns the working set and wires cache, remote, sync and rules together.
///
/// One run is `load -> refresh -> apply_rules -> save`; the interactive UI
/// stops after `refresh` and drives actions itself.
pub struct CoreRuntime {
    config: Config,
    cache: FileCache,
    remote: Arc<dyn RemoteSource>,
    registry: ActionRegistry,
    notifications: Notifications,
}

impl CoreRuntime {
    pub fn new(config: Config, remote: Arc<dyn RemoteSource>) -> Self {
        let cache = FileCache::with_ttl_hours(config.cache_path(), config.cache.ttl_in_hours);
        Self::with_cache(config, cache, remote)
    }

    pub fn with_cache(config: Config, cache: FileCache, remote: Arc<dyn RemoteSource>) -> Self {
        let registry = ActionRegistry::standard(remote.clone());
        Self {
            config,
            cache,
            remote,
            registry,
            notifications: Notifications::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    pub fn remote(&self) -> Arc<dyn RemoteSource> {
        self.remote.clone()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn into_notifications(self) -> Notifications {
        self.notifications
    }

    /// Replace the working set with the cache contents.
    pub fn load(&mut self) -> Result<&Notifications, CacheError> {
        self.notifications = load_notifications(&self.cache)?;
        tracing::info!(
            "cache: loaded {} notifications from {}",
            self.notifications.len(),
            self.cache.path().display()
        );
        Ok(&self.notifications)
    }

    /// Fetch and merge the remote listing when `strategy` and the cache age
    /// call for it. Returns `None` when no fetch happened.
    ///
    /// A failed listing leaves the working set and the cache untouched.
    pub fn refresh(&mut self, strategy: RefreshStrategy) -> Result<Option<SyncReport>> {
        let expired = self.cache.expired();
        if !strategy.should_refresh(expired) {
            tracing::debug!("refresh: skipped (strategy {}, expired {})", strategy, expired);
            return Ok(None);
        }

        let mut remote = self.remote.list().context("Failed to fetch notifications")?;
        if self.config.endpoint.enrich {
            self.enrich(&mut remote);
        }

        let local = std::mem::take(&mut self.notifications);
        let (merged, report) = sync_with_report(local, remote);
        tracing::info!(
            "sync: {} new, {} updated, {} kept, {} dropped",
            report.inserted,
            report.updated,
            report.kept,
            report.dropped
        );
        self.notifications = merged;
        Ok(Some(report))
    }

    /// Fill author and subject details, reusing what the cache already has
    /// for notifications that have not changed since.
    fn enrich(&self, remote: &mut Notifications) {
        for n in remote.iter_mut() {
            if let Some(cached) = self.unchanged_enriched(n) {
                n.author = cached.author.clone();
                n.subject.state = cached.subject.state.clone();
                n.subject.html_url = cached.subject.html_url.clone();
                continue;
            }
            if let Err(e) = self.remote.enrich(n) {
                tracing::warn!("enrich: failed for {}: {}", n.id, e);
            }
        }
    }

    fn unchanged_enriched(&self, n: &Notification) -> Option<&Notification> {
        self.notifications
            .get(&n.id)
            .filter(|cached| cached.updated_at == n.updated_at && cached.author.is_some())
    }

    /// Apply the configured rules to the working set.
    pub fn apply_rules(&mut self, noop: bool, out: &mut dyn Write) -> Result<ApplyReport, RuleError> {
        let rules = self.config.rules.clone();
        self.apply(&rules, noop, out)
    }

    pub fn apply(&mut self, rules: &[Rule], noop: bool, out: &mut dyn Write) -> Result<ApplyReport, RuleError> {
        // the working set only changes once every rule has gone through
        let (applied, report) =
            apply_with_report(rules, self.notifications.clone(), &self.registry, noop, out)?;
        tracing::info!(
            "rules: {} matched, {} ran, {} failed, {} skipped",
            report.matched,
            report.ran,
            report.failed,
            report.skipped
        );
        self.notifications = applied;
        Ok(report)
    }

    pub fn save(&self) -> Result<(), CacheError> {
        save_notifications(&self.cache, &self.notifications)?;
        tracing::debug!(
            "cache: saved {} notifications to {}",
            self.notifications.len(),
            self.cache.path().display()
        );
        Ok(())
    }

    /// `load`, `refresh`, `apply_rules`, then `save` unless `noop`.
    pub fn run(&mut self, strategy: RefreshStrategy, noop: bool, out: &mut dyn Write) -> Result<ApplyReport> {
        self.load().context("Failed to load cache")?;
        self.refresh(strategy)?;
        let report = self.apply_rules(noop, out).context("Failed to apply rules")?;
        if !noop {
            self.save().context("Failed to save cache")?;
        }
        Ok(report)
    }
}
