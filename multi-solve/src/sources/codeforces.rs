use super::{Platform, SolveEvent, SourceError};
use chrono::DateTime;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// General response envelope from the Codeforces API.
/// Codeforces documentation: https://codeforces.com/apiHelp
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", tag = "status")]
enum CfResponse<T> {
    Ok { result: T },
    Failed { comment: String },
}

/// A Submission object from the Codeforces API.
/// Codeforces documentation: https://codeforces.com/apiHelp/objects#Submission
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfSubmission {
    pub id: u64,
    pub creation_time_seconds: i64,
    /// Absent while the submission is still in the judge queue.
    #[serde(default)]
    pub verdict: Option<String>,
    pub problem: CfProblem,
}

/// The problem a submission was made against. `contest_id` is absent for
/// problems outside any contest, e.g. acmsguru archive entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfProblem {
    #[serde(default)]
    pub contest_id: Option<u64>,
    pub index: String,
    pub name: String,
}

const ACCEPTED_VERDICT: &str = "OK";

fn user_status_url(base: &str, handle: &str) -> String {
    // count is capped high enough to cover any realistic submission history
    format!("{}/api/user.status?handle={}&from=1&count=10000", base, handle)
}

/// Retrieves a user's full submission history from the Codeforces API.
/// Codeforces documentation: https://codeforces.com/apiHelp/methods#user.status
pub fn fetch_submissions(
    client: &Client,
    base: &str,
    handle: &str,
) -> Result<Vec<CfSubmission>, SourceError> {
    let response = client
        .get(user_status_url(base, handle))
        .send()?
        .error_for_status()?;
    let packet: CfResponse<Vec<CfSubmission>> = response.json()?;
    match packet {
        CfResponse::Ok { result } => Ok(result),
        CfResponse::Failed { comment } => Err(SourceError::Api {
            platform: Platform::Codeforces,
            comment,
        }),
    }
}

/// Converts raw submissions into solve events, keeping only accepted
/// verdicts. Records missing a contest id or carrying an out-of-range
/// timestamp are skipped with a warning.
pub fn normalize(submissions: Vec<CfSubmission>, user_id: &str) -> Vec<SolveEvent> {
    submissions
        .into_iter()
        .filter_map(|submission| {
            if submission.verdict.as_deref() != Some(ACCEPTED_VERDICT) {
                return None;
            }
            let Some(contest_id) = submission.problem.contest_id else {
                tracing::warn!(
                    "Skipping Codeforces submission {}: problem {:?} has no contest id",
                    submission.id,
                    submission.problem.name
                );
                return None;
            };
            let Some(time) = DateTime::from_timestamp(submission.creation_time_seconds, 0) else {
                tracing::warn!(
                    "Skipping Codeforces submission {}: timestamp {} is out of range",
                    submission.id,
                    submission.creation_time_seconds
                );
                return None;
            };
            Some(SolveEvent {
                user_id: user_id.to_owned(),
                platform: Platform::Codeforces,
                problem_id: format!("{}-{}", contest_id, submission.problem.index),
                problem_name: submission.problem.name,
                time,
                accepted: true,
            })
        })
        .collect()
}
