use reqwest::StatusCode;
use ruach_compass::config::{Config, GatewayUser, StoreBackend};
use ruach_compass::transport::gateway::{hash_token, run_gateway_with_listener};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_TOKEN: &str = "tok-integration";
pub const USER_ID: &str = "u-integration";

pub struct GatewayTestServer {
    pub port: u16,
    pub workspace: TempDir,
    shutdown: CancellationToken,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    pub async fn start(model: &MockServer, tweak: impl FnOnce(&mut Config)) -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.config_path = workspace.path().join("config.toml");
        config.api_key = Some("test-key".to_string());
        config.api_base_url = Some(model.uri());
        config.request_timeout_secs = 5;
        config.store.backend = StoreBackend::Memory;
        config.gateway.users = vec![GatewayUser {
            user_id: USER_ID.to_string(),
            token_sha256: hash_token(USER_TOKEN),
        }];
        tweak(&mut config);

        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();
        let host = "127.0.0.1".to_string();
        let handle = tokio::spawn(async move {
            run_gateway_with_listener(&host, listener, Arc::new(config), stop).await
        });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            workspace,
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    pub async fn post(&self, path: &str, device: &str, body: &Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url(path))
            .header("X-Device-Id", device)
            .json(body)
            .send()
            .await
            .expect("gateway request should complete")
    }

    pub async fn post_as_user(&self, path: &str, body: &Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url(path))
            .bearer_auth(USER_TOKEN)
            .json(body)
            .send()
            .await
            .expect("gateway request should complete")
    }

    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), &mut self.handle)
            .await
            .expect("gateway should stop after shutdown")
            .expect("gateway task should not panic");
        result.expect("gateway should exit cleanly");
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

/// Gemini `generateContent` body whose only text part is `text`.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

/// Every model call answers with `text`.
pub async fn model_answers(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(text)))
        .mount(server)
        .await;
}

/// Every model call fails with `status`.
pub async fn model_fails(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
        .mount(server)
        .await;
}

pub async fn model_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .len()
}

pub fn quest_request() -> Value {
    json!({
        "dailyState": {"energy": 6, "stress": 4, "sleepHours": 7, "focus": "creation"}
    })
}
