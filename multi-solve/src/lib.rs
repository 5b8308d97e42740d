//! Aggregates competitive-programming activity across Codeforces, CodeChef
//! and LeetCode into per-user solve metrics and ranked leaderboards.
//!
//! The pipeline is: raw feed -> [`sources`] adapters -> solve events ->
//! [`dedup`] -> unique solves -> [`aggregate`] -> [`UserMetrics`] ->
//! [`leaderboard`] -> ranked view. The [`update`] module drives the whole
//! pass and persists results through a [`store::MetricsStore`].
//!
//! [`UserMetrics`]: aggregate::UserMetrics

pub mod aggregate;
pub mod dedup;
pub mod leaderboard;
pub mod sources;
pub mod store;
pub mod update;
