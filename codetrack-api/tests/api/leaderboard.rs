use crate::fixtures::{cf_submission, mount_codeforces_submissions, mount_leetcode_counts};
use crate::helpers::TestApp;

async fn register_and_update(app: &TestApp, username: &str, platform_field: &str, score: Option<f64>) {
    let handle = format!("{}_{}", username, platform_field);
    app.post_register(format!("username={}&{}={}", username, platform_field, handle))
        .await;
    let body = match score {
        Some(score) => format!("username={}&score={}", username, score),
        None => format!("username={}", username),
    };
    let response = app.post_update(body).await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn an_empty_leaderboard_is_a_404() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.get_leaderboard("").await;

    // Assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn users_rank_by_total_problems_solved() {
    // Arrange
    let app = TestApp::spawn().await;
    mount_codeforces_submissions(
        &app.codeforces,
        "alice_codeforces",
        vec![cf_submission(1, 1, "A", "OK", 1_600_000_000)],
    )
    .await;
    mount_codeforces_submissions(
        &app.codeforces,
        "bob_codeforces",
        vec![
            cf_submission(1, 1, "A", "OK", 1_600_000_000),
            cf_submission(2, 2, "B", "OK", 1_600_000_100),
            cf_submission(3, 3, "C", "OK", 1_600_000_200),
        ],
    )
    .await;
    register_and_update(&app, "alice", "codeforces", None).await;
    register_and_update(&app, "bob", "codeforces", None).await;

    // Act
    let response = app.get_leaderboard("").await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let board: serde_json::Value = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(board["total_users"], 2);
    let entries = board["leaderboard"].as_array().unwrap();
    assert_eq!(entries[0]["user_id"], "bob");
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["total_problems_solved"], 3);
    assert_eq!(entries[1]["user_id"], "alice");
    assert_eq!(entries[1]["rank"], 2);
}

#[tokio::test]
async fn the_platform_filter_excludes_users_without_that_account() {
    // Arrange
    let app = TestApp::spawn().await;
    mount_codeforces_submissions(
        &app.codeforces,
        "alice_codeforces",
        vec![
            cf_submission(1, 1, "A", "OK", 1_600_000_000),
            cf_submission(2, 2, "B", "OK", 1_600_000_100),
        ],
    )
    .await;
    mount_leetcode_counts(&app.leetcode, "bob_leetcode", 1, 0, 0).await;
    register_and_update(&app, "alice", "codeforces", None).await;
    register_and_update(&app, "bob", "leetcode", None).await;

    // Act
    let response = app.get_leaderboard("?platform=leetcode").await;

    // Assert: alice out-solves bob overall but has no leetcode account.
    assert_eq!(200, response.status().as_u16());
    let board: serde_json::Value = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(board["total_users"], 1);
    let entries = board["leaderboard"].as_array().unwrap();
    assert_eq!(entries[0]["user_id"], "bob");
    assert_eq!(entries[0]["username"], "bob_leetcode");
    assert_eq!(entries[0]["problems_solved"], 1);
}

#[tokio::test]
async fn the_score_view_ranks_by_raw_score() {
    // Arrange
    let app = TestApp::spawn().await;
    mount_codeforces_submissions(
        &app.codeforces,
        "alice_codeforces",
        vec![cf_submission(1, 1, "A", "OK", 1_600_000_000)],
    )
    .await;
    mount_codeforces_submissions(&app.codeforces, "bob_codeforces", vec![]).await;
    register_and_update(&app, "alice", "codeforces", Some(900.0)).await;
    register_and_update(&app, "bob", "codeforces", Some(1200.0)).await;

    // Act
    let response = app.get_leaderboard("?by=score").await;

    // Assert: bob solved nothing but carries the higher score.
    let board: serde_json::Value = response.json().await.expect("Failed to parse as JSON");
    let entries = board["leaderboard"].as_array().unwrap();
    assert_eq!(entries[0]["user_id"], "bob");
    assert_eq!(entries[0]["score"], 1200.0);
    assert_eq!(entries[0]["ema"], 1200.0);
    assert_eq!(entries[1]["user_id"], "alice");
}

#[tokio::test]
async fn invalid_leaderboard_queries_are_a_400() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("?platform=atcoder", "unsupported platform"),
        ("?by=wins", "unsupported view"),
    ];

    for (query, description) in test_cases {
        // Act
        let response = app.get_leaderboard(query).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request for {}.",
            description
        );
    }
}
