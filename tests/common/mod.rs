#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

/// One server binary per test. Dropping it kills and reaps the child.
pub struct TestServer {
    pub auth_url: String,
    pub notes_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick unused ports for isolation
        let auth_port = portpicker::pick_unused_port().context("failed to pick auth port")?;
        let notes_port = portpicker::pick_unused_port().context("failed to pick notes port")?;

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_notes-api-rust"));
        cmd.env("APP_ENV", "development")
            .env("HOST", "127.0.0.1")
            .env("AUTH_PORT", auth_port.to_string())
            .env("NOTES_PORT", notes_port.to_string())
            .env("STORE_BACKEND", "memory")
            .env("JWT_SECRET", "integration-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            auth_url: format!("http://127.0.0.1:{}", auth_port),
            notes_url: format!("http://127.0.0.1:{}", notes_port),
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let auth = client.get(format!("{}/health", self.auth_url)).send().await;
            let notes = client.get(format!("{}/health", self.notes_url)).send().await;
            if let (Ok(a), Ok(n)) = (auth, notes) {
                if a.status() == StatusCode::OK && n.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("services did not become ready within {:?}", timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A username no other test uses.
pub fn unique_user(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Sign up `username` and return its token.
pub async fn signup(server: &TestServer, username: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(format!("{}/auth/signup", server.auth_url))
        .json(&json!({
            "username": username,
            "password": "correct horse",
            "email": format!("{}@example.com", username),
            "date_of_birth": "1990-01-01"
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());

    let header = res
        .headers()
        .get(AUTHORIZATION)
        .context("signup response carries no Authorization header")?
        .to_str()?
        .to_string();
    let body: Value = res.json().await?;
    let token = body["token"].as_str().context("signup body carries no token")?;
    anyhow::ensure!(header == format!("Bearer {}", token), "header and body tokens differ");

    Ok(token.to_string())
}
