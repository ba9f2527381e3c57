use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::fs::copy;
use tempfile::TempDir;
use uuid::Uuid;

use userdesk::config::{AuthConfig, ServerConfig, Settings};
use userdesk::database::{new_pool, run_migrations};
use userdesk::repository::{self, Repo};
use userdesk::startup::Application;

pub const TEST_EMAIL: &str = "test_acct@test.local";
pub const TEST_PASSWORD: &str = "testing87_*Password";

const DB_TEMPLATE_FILE: &str = "test.db";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repo: Repo,
    pub api_client: reqwest::Client,
}

// Migrated once, copied per test.
static TEST_DB_TEMPLATE: Lazy<TempDir> = Lazy::new(|| {
    let temp_dir = TempDir::new().unwrap();
    let template_db_path = temp_dir.path().join(DB_TEMPLATE_FILE);

    let pool = new_pool(template_db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();

    temp_dir
});

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", &self.address, path)
    }

    pub async fn delete_user(&self, token: &str, id: i64) -> reqwest::Response {
        self.api_client
            .delete(&self.url(&format!("/users/{}", id)))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_openapi(&self) -> reqwest::Response {
        self.api_client
            .get(&self.url("/docs/openapi.json"))
            .send()
            .await
            .unwrap()
    }

    pub async fn get_user(&self, token: &str, id: i64) -> reqwest::Response {
        self.api_client
            .get(&self.url(&format!("/users/{}", id)))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_users(&self, token: &str, query: &str) -> reqwest::Response {
        self.api_client
            .get(&self.url(&format!("/users{}", query)))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_login<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(&self.url("/login"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_logout(&self, token: &str) -> reqwest::Response {
        self.api_client
            .post(&self.url("/logout"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_register<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(&self.url("/register"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_user(&self, token: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&self.url("/users"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put_user(&self, token: &str, id: i64, body: &Value) -> reqwest::Response {
        self.api_client
            .put(&self.url(&format!("/users/{}", id)))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Registers the test account and logs it in, returning its id and token.
    pub async fn login_test_user(&self) -> (i64, String) {
        let user: Value = self
            .post_register(&register_params(TEST_EMAIL))
            .await
            .json()
            .await
            .unwrap();

        let token: Value = self
            .post_login(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
            .await
            .json()
            .await
            .unwrap();

        (
            user["id"].as_i64().unwrap(),
            token["token"].as_str().unwrap().to_string(),
        )
    }
}

pub fn register_params(email: &str) -> Value {
    json!({
        "name": "Test User",
        "email": email,
        "password": TEST_PASSWORD,
        "password_confirmation": TEST_PASSWORD
    })
}

pub fn spawn_test_db() -> String {
    let test_db_dir = Lazy::force(&TEST_DB_TEMPLATE);
    let template_db = test_db_dir.path().join(DB_TEMPLATE_FILE);
    let db_instance = test_db_dir.path().join(format!("{}.db", Uuid::new_v4()));

    copy(&template_db, &db_instance).unwrap();

    db_instance.to_str().unwrap().to_string()
}

pub async fn spawn_app() -> TestApp {
    let settings = Settings {
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".into(),
            token_ttl_secs: 3600,
        },
        database_url: spawn_test_db(),
        server: ServerConfig {
            allow_localhost_cors: true,
            host: "127.0.0.1".into(),
            port: 0,
        },
        telemetry: None,
    };

    let repo = repository::implementation(&settings.database_url).unwrap();
    let application = Application::build(settings, repo).unwrap();
    let port = application.port();

    let _ = tokio::spawn(application.run_until_stopped());

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        repo,
        api_client: client,
    }
}
