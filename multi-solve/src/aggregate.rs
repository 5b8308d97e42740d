use crate::sources::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default smoothing period for the score EMA.
pub const DEFAULT_EMA_PERIOD: u32 = 7;

/// A user's standing on one platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    /// The user's handle on that platform.
    pub username: String,
    pub problems_solved: usize,
    pub last_updated: DateTime<Utc>,
}

/// The long-lived aggregate record for one user. Created on the first
/// successful aggregation pass and merged into, one platform at a time,
/// on every pass after that.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserMetrics {
    pub user_id: String,
    pub display_name: String,
    pub platforms: HashMap<Platform, PlatformStats>,
    /// Always equals the sum of the per-platform counts.
    pub total_problems_solved: usize,
    /// The most recent score sample.
    pub score: f64,
    /// Recency-weighted running average of the score; `None` until the
    /// first sample arrives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema: Option<f64>,
}

impl UserMetrics {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            platforms: HashMap::new(),
            total_problems_solved: 0,
            score: 0.0,
            ema: None,
        }
    }

    /// Replaces one platform's stats wholesale; the other platforms'
    /// entries are untouched. Restores the total-count invariant.
    pub fn apply_platform_update(&mut self, platform: Platform, stats: PlatformStats) {
        self.platforms.insert(platform, stats);
        self.total_problems_solved = self.platforms.values().map(|s| s.problems_solved).sum();
    }

    /// Feeds one score sample into the running EMA. A non-finite sample
    /// leaves both the score and the EMA unchanged.
    pub fn observe_score(&mut self, sample: f64, period: u32) {
        if !sample.is_finite() {
            tracing::warn!(
                "Ignoring non-finite score sample for {}: {}",
                self.user_id,
                sample
            );
            return;
        }
        self.score = sample;
        self.ema = Some(next_ema(self.ema, sample, period));
    }
}

/// One step of the exponential-moving-average recurrence.
///
/// The very first sample becomes the average outright; each later sample
/// moves it by a factor of `k = 2 / (period + 1)`. Only the previous
/// average is needed, never the full history.
pub fn next_ema(prev: Option<f64>, sample: f64, period: u32) -> f64 {
    match prev {
        None => sample,
        Some(ema) => {
            let k = 2.0 / (f64::from(period) + 1.0);
            (sample - ema) * k + ema
        }
    }
}
