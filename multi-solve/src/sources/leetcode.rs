use super::{Platform, SourceError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Solved-problem counts per difficulty tier, as shown on a LeetCode
/// profile. This platform contributes counts directly; it never produces
/// individual solve events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyCounts {
    pub fn total(self) -> usize {
        self.easy + self.medium + self.hard
    }
}

// The profile page renders its numbers client-side, so we read them from
// the site's GraphQL endpoint rather than the HTML.
const SOLVED_COUNTS_QUERY: &str = "\
query userProblemsSolved($username: String!) {
  matchedUser(username: $username) {
    submitStatsGlobal {
      acSubmissionNum { difficulty count }
    }
  }
}";

#[derive(Serialize)]
struct GraphqlQuery<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    username: &'a str,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    #[serde(default)]
    matched_user: Option<MatchedUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUser {
    submit_stats_global: SubmitStats,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    ac_submission_num: Vec<DifficultyEntry>,
}

#[derive(Deserialize)]
struct DifficultyEntry {
    difficulty: String,
    count: usize,
}

/// Fetches a user's accepted-problem counts per difficulty.
pub fn fetch_solved_counts(
    client: &Client,
    base: &str,
    username: &str,
) -> Result<DifficultyCounts, SourceError> {
    let response = client
        .post(format!("{}/graphql", base))
        .json(&GraphqlQuery {
            query: SOLVED_COUNTS_QUERY,
            variables: Variables { username },
        })
        .send()?
        .error_for_status()?;
    let packet: GraphqlResponse = response.json()?;
    let user = packet
        .data
        .and_then(|data| data.matched_user)
        .ok_or_else(|| SourceError::Api {
            platform: Platform::LeetCode,
            comment: format!("no such user: {}", username),
        })?;
    Ok(normalize_counts(&user.submit_stats_global.ac_submission_num))
}

/// Folds the per-difficulty entries into a counts snapshot. The endpoint
/// also returns an aggregate "All" row, which is ignored rather than
/// double-counted.
fn normalize_counts(entries: &[DifficultyEntry]) -> DifficultyCounts {
    let mut counts = DifficultyCounts::default();
    for entry in entries {
        match entry.difficulty.as_str() {
            "Easy" => counts.easy = entry.count,
            "Medium" => counts.medium = entry.count,
            "Hard" => counts.hard = entry.count,
            _ => {}
        }
    }
    counts
}
