use super::ApiError;
use actix_web::{HttpResponse, web};
use anyhow::Context;
use multi_solve::leaderboard::{self, LeaderboardEntry, RankingKey};
use multi_solve::sources::Platform;
use multi_solve::store::{JsonMetricsStore, MetricsStore};

#[derive(serde::Deserialize)]
pub struct QueryData {
    platform: Option<String>,
    by: Option<String>,
}

#[derive(serde::Serialize)]
pub struct LeaderboardResponse {
    pub total_users: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[tracing::instrument(
    name = "Requesting a leaderboard",
    skip(query, store),
    fields(platform = ?query.platform, by = ?query.by)
)]
pub async fn leaderboard(
    query: web::Query<QueryData>,
    store: web::Data<JsonMetricsStore>,
) -> Result<HttpResponse, ApiError> {
    let key = ranking_key(&query)?;

    let store = store.into_inner();
    let metrics = web::block(move || store.load_all())
        .await
        .context("the leaderboard task could not be scheduled")?
        .context("failed to load the stored metrics")?;

    let entries = leaderboard::build(&metrics, key);
    // An empty board reads as "nothing here yet" rather than a bare list.
    if entries.is_empty() {
        return Err(ApiError::EmptyLeaderboard);
    }
    Ok(HttpResponse::Ok().json(LeaderboardResponse {
        total_users: entries.len(),
        leaderboard: entries,
    }))
}

/// A `platform` filter takes precedence; otherwise `by` picks between the
/// total-solved and raw-score views, defaulting to totals.
fn ranking_key(query: &QueryData) -> Result<RankingKey, ApiError> {
    if let Some(platform) = &query.platform {
        let platform: Platform = platform.parse().map_err(ApiError::InvalidQuery)?;
        return Ok(RankingKey::Platform(platform));
    }
    match query.by.as_deref() {
        None | Some("total") => Ok(RankingKey::TotalSolved),
        Some("score") => Ok(RankingKey::Score),
        Some(other) => Err(ApiError::InvalidQuery(format!(
            "{} is not a leaderboard view. Must be one of: total, score",
            other
        ))),
    }
}
