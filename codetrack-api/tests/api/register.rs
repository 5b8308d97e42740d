use crate::helpers::TestApp;
use fake::Fake;
use fake::faker::internet::en::Username;

#[tokio::test]
async fn register_returns_a_200_for_valid_form_data() {
    // Arrange
    let app = TestApp::spawn().await;
    let username: String = Username().fake();
    let body = format!(
        "username={}&codeforces=alice_cf&leetcode=alice_lc",
        username
    );

    // Act
    let response = app.post_register(body).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let profile: serde_json::Value = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(profile["user_id"], username.as_str());
    // The display name falls back to the user id when omitted.
    assert_eq!(profile["display_name"], username.as_str());
    assert_eq!(profile["handles"]["codeforces"], "alice_cf");
    assert_eq!(profile["handles"]["leetcode"], "alice_lc");
    assert_eq!(profile["handles"].get("codechef"), None);
}

#[tokio::test]
async fn register_returns_a_400_when_data_is_invalid() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("codeforces=alice_cf", "missing username"),
        ("username=alice", "no platform handles at all"),
        ("username=&codeforces=alice_cf", "empty username"),
        ("username=al/ice&codeforces=alice_cf", "forbidden characters"),
        ("username=alice&codeforces=", "empty platform handle"),
    ];

    for (body, description) in test_cases {
        // Act
        let response = app.post_register(body.into()).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn registering_twice_overwrites_the_profile() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    app.post_register("username=alice&codeforces=old_handle".into())
        .await;
    let response = app
        .post_register("username=alice&display_name=Alice&codeforces=new_handle".into())
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let profile: serde_json::Value = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(profile["handles"]["codeforces"], "new_handle");
    assert_eq!(profile["display_name"], "Alice");
}
