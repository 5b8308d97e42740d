use crate::fixtures::{
    cf_submission, codechef_profile_html, mount_codechef_profile, mount_codeforces_submissions,
    mount_leetcode_counts,
};
use crate::helpers::TestApp;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn updating_an_unregistered_user_returns_a_404() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_update("username=nobody".into()).await;

    // Assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn a_full_update_aggregates_all_three_platforms() {
    // Arrange
    let app = TestApp::spawn().await;
    app.post_register(
        "username=alice&display_name=Alice&codeforces=alice_cf&codechef=alice_cc&leetcode=alice_lc"
            .into(),
    )
    .await;

    // Four submissions, but only two distinct accepted problems.
    mount_codeforces_submissions(
        &app.codeforces,
        "alice_cf",
        vec![
            cf_submission(1, 1520, "B", "OK", 1_600_000_000),
            cf_submission(2, 1520, "B", "OK", 1_600_000_500),
            cf_submission(3, 1520, "C", "WRONG_ANSWER", 1_600_001_000),
            cf_submission(4, 1462, "A", "OK", 1_600_002_000),
        ],
    )
    .await;
    // Two accepted rows for the same problem plus a rejection.
    mount_codechef_profile(
        &app.codechef,
        "alice_cc",
        codechef_profile_html(&[
            ("09:41 PM 28/07/25", "FLOW001", "accepted"),
            ("08:00 PM 28/07/25", "FLOW001", "accepted"),
            ("07:00 PM 27/07/25", "START01", "wrong answer"),
        ]),
    )
    .await;
    mount_leetcode_counts(&app.leetcode, "alice_lc", 3, 2, 1).await;

    // Act
    let response = app.post_update("username=alice".into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let metrics: serde_json::Value = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(metrics["user_id"], "alice");
    assert_eq!(metrics["platforms"]["codeforces"]["problems_solved"], 2);
    assert_eq!(metrics["platforms"]["codechef"]["problems_solved"], 1);
    assert_eq!(metrics["platforms"]["leetcode"]["problems_solved"], 6);
    assert_eq!(metrics["total_problems_solved"], 9);
}

#[tokio::test]
async fn the_ema_streams_across_successive_updates() {
    // Arrange
    let app = TestApp::spawn().await;
    app.post_register("username=bob&codeforces=bob_cf".into())
        .await;
    mount_codeforces_submissions(
        &app.codeforces,
        "bob_cf",
        vec![cf_submission(1, 1, "A", "OK", 1_600_000_000)],
    )
    .await;

    // Act
    let first = app.post_update("username=bob&score=1000".into()).await;
    let second = app.post_update("username=bob&score=1050".into()).await;

    // Assert: k = 2/(7+1), so the second EMA is (1050-1000)/4 + 1000.
    let first: serde_json::Value = first.json().await.expect("Failed to parse as JSON");
    assert_eq!(first["ema"], 1000.0);
    let second: serde_json::Value = second.json().await.expect("Failed to parse as JSON");
    assert_eq!(second["ema"], 1012.5);
    assert_eq!(second["score"], 1050.0);
}

#[tokio::test]
async fn a_platform_outage_keeps_the_previous_stats() {
    // Arrange
    let app = TestApp::spawn().await;
    app.post_register("username=carol&codeforces=carol_cf&leetcode=carol_lc".into())
        .await;
    mount_codeforces_submissions(
        &app.codeforces,
        "carol_cf",
        vec![
            cf_submission(1, 1, "A", "OK", 1_600_000_000),
            cf_submission(2, 1, "B", "OK", 1_600_000_100),
        ],
    )
    .await;
    mount_leetcode_counts(&app.leetcode, "carol_lc", 1, 1, 1).await;
    let healthy = app.post_update("username=carol".into()).await;
    let healthy: serde_json::Value = healthy.json().await.expect("Failed to parse as JSON");
    assert_eq!(healthy["total_problems_solved"], 5);

    // LeetCode goes down; Codeforces keeps answering.
    app.leetcode.reset().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.leetcode)
        .await;

    // Act
    let degraded = app.post_update("username=carol".into()).await;

    // Assert: the pass succeeds and the stale LeetCode count survives.
    assert_eq!(200, degraded.status().as_u16());
    let degraded: serde_json::Value = degraded.json().await.expect("Failed to parse as JSON");
    assert_eq!(degraded["platforms"]["leetcode"]["problems_solved"], 3);
    assert_eq!(degraded["total_problems_solved"], 5);
}
