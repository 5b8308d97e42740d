use crate::aggregate::{PlatformStats, UserMetrics};
use crate::dedup;
use crate::sources::{Normalized, Platform, SourceClient, SourceConfig, SourceError};
use crate::store::{MetricsStore, StoreError, UserProfile};
use chrono::Utc;
use rayon::prelude::*;
use std::sync::Arc;

/// Fetch failures degrade rather than fail a pass, so the only way an
/// update can error out is at the persistence boundary.
#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives one full aggregation pass per user: fetch each registered
/// platform's feed, normalize, dedupe, merge the counts into the stored
/// metrics, and persist the result.
pub struct Updater {
    client: SourceClient,
    store: Arc<dyn MetricsStore>,
    ema_period: u32,
}

impl Updater {
    pub fn new(
        config: SourceConfig,
        store: Arc<dyn MetricsStore>,
        ema_period: u32,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: SourceClient::new(config)?,
            store,
            ema_period,
        })
    }

    /// Refreshes one user's metrics across every platform they registered.
    ///
    /// A platform whose fetch fails keeps its previous stats for this
    /// pass; the failure is logged and never aborts the other platforms.
    /// Only a persistence failure surfaces as an error.
    pub fn update_user(
        &self,
        profile: &UserProfile,
        score_sample: Option<f64>,
    ) -> Result<UserMetrics, UpdateError> {
        let mut metrics = self
            .store
            .load(&profile.user_id)?
            .unwrap_or_else(|| UserMetrics::new(&profile.user_id, &profile.display_name));
        metrics.display_name.clone_from(&profile.display_name);

        // Each platform fetch is independent I/O, so they run concurrently
        // on the rayon pool; the merge below stays sequential.
        let refreshed: Vec<(Platform, Result<PlatformStats, SourceError>)> = profile
            .handles
            .par_iter()
            .map(|(&platform, username)| {
                (
                    platform,
                    self.refresh_platform(&profile.user_id, platform, username),
                )
            })
            .collect();
        for (platform, outcome) in refreshed {
            match outcome {
                Ok(stats) => metrics.apply_platform_update(platform, stats),
                Err(err) => tracing::warn!(
                    "Leaving {} stats unchanged for {}: {}",
                    platform,
                    profile.user_id,
                    err
                ),
            }
        }
        if let Some(sample) = score_sample {
            metrics.observe_score(sample, self.ema_period);
        }

        self.store.save(&metrics)?;
        tracing::info!(
            "Updated {}: {} problems solved across {} platforms",
            metrics.user_id,
            metrics.total_problems_solved,
            metrics.platforms.len()
        );
        Ok(metrics)
    }

    fn refresh_platform(
        &self,
        user_id: &str,
        platform: Platform,
        username: &str,
    ) -> Result<PlatformStats, SourceError> {
        let feed = self.client.fetch(platform, username)?;
        let problems_solved = match feed.normalize(user_id) {
            Normalized::Events(events) => dedup::dedupe(events).len(),
            Normalized::Counts(counts) => counts.total(),
        };
        Ok(PlatformStats {
            username: username.to_owned(),
            problems_solved,
            last_updated: Utc::now(),
        })
    }

    /// Refreshes every profile, in parallel across users. Failures are
    /// isolated per user; the rayon pool bounds how many passes are in
    /// flight at once.
    pub fn update_all(
        &self,
        profiles: &[UserProfile],
    ) -> Vec<(String, Result<UserMetrics, UpdateError>)> {
        profiles
            .par_iter()
            .map(|profile| (profile.user_id.clone(), self.update_user(profile, None)))
            .collect()
    }
}
