use crate::aggregate::UserMetrics;
use crate::sources::Platform;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which number a leaderboard is ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankingKey {
    /// Problems solved across every platform.
    TotalSolved,
    /// The latest raw score sample.
    Score,
    /// Problems solved on a single platform; users with no account there
    /// are excluded from the view.
    Platform(Platform),
}

/// One row of a ranked view. Rebuilt on every query and discarded with
/// the response; never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub value: f64,
    #[serde(flatten)]
    pub detail: EntryDetail,
}

/// The view-specific slice of a user's metrics carried alongside the
/// ranking value.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum EntryDetail {
    Full {
        total_problems_solved: usize,
        platforms: BTreeMap<Platform, PlatformBreakdown>,
    },
    Platform {
        username: String,
        problems_solved: usize,
        last_updated: DateTime<Utc>,
    },
    Score {
        score: f64,
        ema: Option<f64>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct PlatformBreakdown {
    pub username: String,
    pub problems_solved: usize,
}

/// Builds a ranked view over the given metrics: descending by ranking
/// value, with dense 1-based ranks assigned by position.
///
/// The sort is stable, so ties retain their input order; callers that
/// need a deterministic tie-break should pre-sort the input by a
/// secondary key such as the user id. Empty input yields an empty view;
/// whether that is an error is the caller's decision.
pub fn build(metrics: &[UserMetrics], key: RankingKey) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = metrics
        .iter()
        .filter_map(|user| entry_for(user, key))
        .collect();
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }
    entries
}

fn entry_for(user: &UserMetrics, key: RankingKey) -> Option<LeaderboardEntry> {
    let (value, detail) = match key {
        RankingKey::TotalSolved => {
            // A user with no platform accounts at all has nothing to rank.
            if user.platforms.is_empty() {
                return None;
            }
            (
                user.total_problems_solved as f64,
                EntryDetail::Full {
                    total_problems_solved: user.total_problems_solved,
                    platforms: user
                        .platforms
                        .iter()
                        .map(|(&platform, stats)| {
                            (
                                platform,
                                PlatformBreakdown {
                                    username: stats.username.clone(),
                                    problems_solved: stats.problems_solved,
                                },
                            )
                        })
                        .collect(),
                },
            )
        }
        RankingKey::Score => (
            user.score,
            EntryDetail::Score {
                score: user.score,
                ema: user.ema,
            },
        ),
        RankingKey::Platform(platform) => {
            let stats = user
                .platforms
                .get(&platform)
                .filter(|stats| !stats.username.is_empty())?;
            (
                stats.problems_solved as f64,
                EntryDetail::Platform {
                    username: stats.username.clone(),
                    problems_solved: stats.problems_solved,
                    last_updated: stats.last_updated,
                },
            )
        }
    };
    Some(LeaderboardEntry {
        rank: 0,
        user_id: user.user_id.clone(),
        display_name: user.display_name.clone(),
        value,
        detail,
    })
}
