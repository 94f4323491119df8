//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.
//! The session rides in a cookie, so every client carries a cookie store;
//! redirects are never followed automatically so tests can assert on them.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use blog_api::{create_app, create_app_state};
use blog_common::AppConfig;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        // Bind to an ephemeral port
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));

        // Create app state
        let state = create_app_state(config).await?;

        // Build application
        let app = create_app(state);

        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(Self {
            addr: actual_addr,
            client: new_client()?,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request with the server's default session
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.get_with(&self.client, path).await
    }

    /// Make a POST request with JSON body using the default session
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        self.post_with(&self.client, path, body).await
    }

    /// Make a GET request with a specific client (its own cookie jar)
    pub async fn get_with(&self, client: &Client, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(client.get(&url).send().await?)
    }

    /// Make a POST request with a specific client
    pub async fn post_with<T: Serialize>(
        &self,
        client: &Client,
        path: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(client.post(&url).json(body).send().await?)
    }

    /// Make a bodiless POST request with a specific client
    pub async fn post_empty_with(&self, client: &Client, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(client.post(&url).send().await?)
    }

    /// Make a multipart POST request with a specific client
    pub async fn post_multipart_with(
        &self,
        client: &Client,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(client.post(&url).multipart(form).send().await?)
    }
}

/// Build a fresh client with its own cookie jar (one per simulated browser)
pub fn new_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .redirect(Policy::none())
        .build()?)
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    // The signing secret is test-local unless the environment supplies one
    if std::env::var("SECRET_KEY").is_err() {
        std::env::set_var("SECRET_KEY", "integration-test-secret-key");
    }

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Helper to check if the test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
