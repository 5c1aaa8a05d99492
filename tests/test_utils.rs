use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use skill_matrix::{
    repositories::kv_store::{MemoryStore, SharedStore},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use std::{net::TcpListener, sync::Arc, time::Duration};

pub const EMPLOYEE_EMAIL: &str = "john.doe@company.com";
pub const MANAGER_EMAIL: &str = "manager@company.com";
pub const DEMO_PASSWORD: &str = "password123";

#[derive(Clone)]
pub struct TestApp {
    pub state: web::Data<AppState>,
    pub store: SharedStore,
    pub address: String,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryStore::new())).await
    }

    /// Starts a server over an existing store, as a restart would.
    pub async fn spawn_with_store(store: SharedStore) -> Self {
        let config = test_config();
        let state = web::Data::new(AppState::new(config.clone(), store.clone()));
        state.restore_session().await;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state_clone.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/v1/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            store,
            address,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Skill Matrix Test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        worker_count: 1,
        login_delay_ms: 0,
        ..AppConfig::default()
    }
}

#[async_trait]
pub trait ApiTestHelpers: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Response;
    async fn login_as_employee(&self) -> Value;
    async fn login_as_manager(&self) -> Value;
    async fn get_json(&self, path: &str) -> Value;
    async fn set_level(&self, skill_id: &str, level: i64) -> Response;
    async fn submit(&self) -> Response;
}

#[async_trait]
impl ApiTestHelpers for TestApp {
    async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to log in")
    }

    async fn login_as_employee(&self) -> Value {
        let response = self.login(EMPLOYEE_EMAIL, DEMO_PASSWORD).await;
        assert!(response.status().is_success());
        response.json().await.unwrap()
    }

    async fn login_as_manager(&self) -> Value {
        let response = self.login(MANAGER_EMAIL, DEMO_PASSWORD).await;
        assert!(response.status().is_success());
        response.json().await.unwrap()
    }

    async fn get_json(&self, path: &str) -> Value {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success(), "GET {} returned {}", path, response.status());
        response.json().await.unwrap()
    }

    async fn set_level(&self, skill_id: &str, level: i64) -> Response {
        self.client
            .put(self.url(&format!("/api/v1/assessment/skills/{}/level", skill_id)))
            .json(&json!({ "level": level }))
            .send()
            .await
            .expect("Failed to set level")
    }

    async fn submit(&self) -> Response {
        self.client
            .post(self.url("/api/v1/assessment/submit"))
            .send()
            .await
            .expect("Failed to submit")
    }
}

/// Finds a skill by id anywhere in a `categories` array.
pub fn find_skill<'a>(view: &'a Value, skill_id: &str) -> Option<&'a Value> {
    view["categories"]
        .as_array()?
        .iter()
        .filter_map(|c| c["skills"].as_array())
        .flatten()
        .find(|s| s["id"] == skill_id)
}
