use codetrack_api::configuration::get_configuration;
use codetrack_api::startup::Application;
use codetrack_api::telemetry::{get_subscriber, init_subscriber};
use std::sync::LazyLock;
use tempfile::TempDir;
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once.
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    /// Stand-ins for the three platforms; mount mocks here.
    pub codeforces: MockServer,
    pub codechef: MockServer,
    pub leetcode: MockServer,
    // Held so the store directory outlives the test.
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        LazyLock::force(&TRACING);

        let codeforces = MockServer::start().await;
        let codechef = MockServer::start().await;
        let leetcode = MockServer::start().await;
        let data_dir = TempDir::new().expect("Failed to create a temporary data directory");

        // Randomise configuration to ensure test isolation.
        let configuration = {
            let mut c = get_configuration().expect("Failed to read configuration.");
            // Use a random OS port and a fresh store per test case.
            c.application.port = 0;
            c.store.data_dir = data_dir.path().to_path_buf();
            // Point every platform at its mock stand-in.
            c.sources.codeforces_url = codeforces.uri();
            c.sources.codechef_url = codechef.uri();
            c.sources.leetcode_url = leetcode.uri();
            c.sources.timeout_secs = 5;
            c.sources.max_attempts = 1;
            c
        };

        // Launch the application as a background task.
        let application = Application::build(&configuration)
            .await
            .expect("Failed to build application.");
        let address = format!("http://127.0.0.1:{}", application.port());
        let _ = tokio::spawn(application.run_until_stopped());

        Self {
            address,
            codeforces,
            codechef,
            leetcode,
            _data_dir: data_dir,
        }
    }

    pub async fn get_health_check(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, method: &str, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/{}", &self.address, method))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_register(&self, body: String) -> reqwest::Response {
        self.post("register", body).await
    }

    pub async fn post_update(&self, body: String) -> reqwest::Response {
        self.post("update", body).await
    }

    pub async fn get_leaderboard(&self, query: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/leaderboard{}", &self.address, query))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
