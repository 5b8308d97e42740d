use super::{Platform, SolveEvent, SourceError};
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::blocking::Client;
use select::document::Document;
use select::predicate::{Class, Name, Predicate};
use serde::{Deserialize, Serialize};

/// One row of the recent-activity widget on a CodeChef profile page,
/// exactly as displayed: (time, problem, result, language).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub time: String,
    pub problem: String,
    pub result: String,
    pub language: String,
}

// The widget renders times like "09:41 PM 28/07/25". This is a display
// format, not an API contract, so parsing must tolerate surprises.
const ACTIVITY_TIME_FORMAT: &str = "%I:%M %p %d/%m/%y";

fn profile_url(base: &str, username: &str) -> String {
    format!("{}/users/{}", base, username)
}

/// Fetches a profile page and extracts its recent-activity rows,
/// newest-first as CodeChef displays them.
pub fn fetch_recent_activity(
    client: &Client,
    base: &str,
    username: &str,
) -> Result<Vec<ActivityRow>, SourceError> {
    let response = client
        .get(profile_url(base, username))
        .send()?
        .error_for_status()?;
    let page_text = response.text()?;
    scrape_recent_activity(&Document::from(page_text.as_str()))
}

/// Pulls activity rows out of an already-parsed profile page.
pub fn scrape_recent_activity(page: &Document) -> Result<Vec<ActivityRow>, SourceError> {
    let table = page
        .find(
            Class("widget")
                .and(Class("recent-activity"))
                .descendant(Name("table")),
        )
        .next()
        .ok_or(SourceError::Scrape {
            platform: Platform::CodeChef,
            what: "the recent-activity table",
        })?;

    let mut rows = Vec::new();
    for tr in table.find(Name("tbody").descendant(Name("tr"))) {
        let cells: Vec<String> = tr
            .find(Name("td"))
            .map(|td| td.text().trim().to_owned())
            .collect();
        // Rows with fewer cells are spacers or "no recent activity" notices.
        if let [time, problem, result, language, ..] = cells.as_slice() {
            rows.push(ActivityRow {
                time: time.clone(),
                problem: problem.clone(),
                result: result.clone(),
                language: language.clone(),
            });
        }
    }
    Ok(rows)
}

/// The result column shows either a verdict word or a score; full marks
/// count as accepted, partial scores and rejections do not.
fn is_accepted(result: &str) -> bool {
    result.to_ascii_lowercase().contains("accepted") || result.contains("(100)")
}

fn parse_activity_time(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), ACTIVITY_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Converts activity rows into solve events.
///
/// The widget lists rows newest-first, so they are reversed here; the
/// downstream first-solve policy depends on oldest-first order. Rows whose
/// display time fails to parse are dropped with a warning, and only
/// accepted submissions become events. CodeChef exposes no contest
/// namespace in this widget, so the problem name doubles as the id.
pub fn normalize(rows: Vec<ActivityRow>, user_id: &str) -> Vec<SolveEvent> {
    rows.into_iter()
        .rev()
        .filter_map(|row| {
            if !is_accepted(&row.result) {
                return None;
            }
            let Some(time) = parse_activity_time(&row.time) else {
                tracing::warn!(
                    "Dropping CodeChef activity row for {:?}: unparseable time {:?}",
                    row.problem,
                    row.time
                );
                return None;
            };
            Some(SolveEvent {
                user_id: user_id.to_owned(),
                platform: Platform::CodeChef,
                problem_id: row.problem.clone(),
                problem_name: row.problem,
                time,
                accepted: true,
            })
        })
        .collect()
}
