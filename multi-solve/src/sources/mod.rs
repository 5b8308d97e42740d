mod codechef;
mod codeforces;
mod leetcode;

pub use codechef::ActivityRow;
pub use codeforces::{CfProblem, CfSubmission};
pub use leetcode::DifficultyCounts;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The sites we track activity on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Codeforces,
    CodeChef,
    LeetCode,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Codeforces, Platform::CodeChef, Platform::LeetCode];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::CodeChef => "codechef",
            Platform::LeetCode => "leetcode",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "codeforces" => Ok(Platform::Codeforces),
            "codechef" => Ok(Platform::CodeChef),
            "leetcode" => Ok(Platform::LeetCode),
            name => Err(format!(
                "{} is not a supported platform. Must be one of: codeforces, codechef, leetcode",
                name
            )),
        }
    }
}

/// A single successful-solve record in canonical form, produced by the
/// per-platform adapters and immutable from then on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveEvent {
    pub user_id: String,
    pub platform: Platform,
    /// Unique within its platform; the platform's own composite id, e.g.
    /// `"1520-B"` on Codeforces or the problem name on CodeChef.
    pub problem_id: String,
    pub problem_name: String,
    pub time: DateTime<Utc>,
    pub accepted: bool,
}

/// A platform's raw activity feed. A closed set of tagged variants rather
/// than one catch-all record full of optional fields.
#[derive(Clone, Debug)]
pub enum RawFeed {
    /// Flat submission list from the Codeforces JSON API.
    Codeforces(Vec<CfSubmission>),
    /// Recent-activity rows scraped from a CodeChef profile, newest-first.
    CodeChef(Vec<ActivityRow>),
    /// Per-difficulty solved counts; LeetCode exposes no event feed.
    LeetCode(DifficultyCounts),
}

/// The canonical form of a raw feed: ordered solve events for the
/// event-based platforms, a direct count contribution for LeetCode.
#[derive(Clone, Debug)]
pub enum Normalized {
    Events(Vec<SolveEvent>),
    Counts(DifficultyCounts),
}

impl RawFeed {
    /// Normalizes the feed for the given user. Malformed individual
    /// records are skipped with a warning; this never fails outright.
    pub fn normalize(self, user_id: &str) -> Normalized {
        match self {
            RawFeed::Codeforces(submissions) => {
                Normalized::Events(codeforces::normalize(submissions, user_id))
            }
            RawFeed::CodeChef(rows) => Normalized::Events(codechef::normalize(rows, user_id)),
            RawFeed::LeetCode(counts) => Normalized::Counts(counts),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{platform} refused the request: {comment}")]
    Api { platform: Platform, comment: String },
    #[error("could not locate {what} on the {platform} page")]
    Scrape {
        platform: Platform,
        what: &'static str,
    },
}

/// Where and how to fetch the raw feeds.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceConfig {
    pub codeforces_url: String,
    pub codechef_url: String,
    pub leetcode_url: String,
    /// Per-request timeout; scrapes of slow profile pages need tens of seconds.
    pub timeout_secs: u64,
    /// Total tries per fetch, including the first.
    pub max_attempts: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            codeforces_url: "https://codeforces.com".to_string(),
            codechef_url: "https://www.codechef.com".to_string(),
            leetcode_url: "https://leetcode.com".to_string(),
            timeout_secs: 30,
            max_attempts: 2,
        }
    }
}

// CodeChef serves a challenge page to clients that don't look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Blocking fetcher for all three platforms, with bounded retries.
pub struct SourceClient {
    http: Client,
    config: SourceConfig,
}

impl SourceClient {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetches one platform's raw feed for the given platform username,
    /// retrying up to the configured attempt limit.
    pub fn fetch(&self, platform: Platform, username: &str) -> Result<RawFeed, SourceError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(platform, username) {
                Ok(feed) => return Ok(feed),
                Err(err) if attempt < self.config.max_attempts => {
                    tracing::warn!(
                        "Retrying {} fetch for {} after attempt {} failed: {}",
                        platform,
                        username,
                        attempt,
                        err
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn fetch_once(&self, platform: Platform, username: &str) -> Result<RawFeed, SourceError> {
        match platform {
            Platform::Codeforces => {
                codeforces::fetch_submissions(&self.http, &self.config.codeforces_url, username)
                    .map(RawFeed::Codeforces)
            }
            Platform::CodeChef => {
                codechef::fetch_recent_activity(&self.http, &self.config.codechef_url, username)
                    .map(RawFeed::CodeChef)
            }
            Platform::LeetCode => {
                leetcode::fetch_solved_counts(&self.http, &self.config.leetcode_url, username)
                    .map(RawFeed::LeetCode)
            }
        }
    }
}
