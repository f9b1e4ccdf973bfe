//! Rendered-page engine.
//!
//! JavaScript-driven listings are fetched through a Browserless-compatible
//! `/content` endpoint. The engine is a single process-scoped handle:
//! [`install`] records its settings once, the client is created lazily on
//! first use behind an async mutex (concurrent first callers share one
//! initialization), and [`shutdown`] drops it explicitly.

use super::RenderSpec;
use crate::error::FetchError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

static ENGINE: OnceCell<RenderEngine> = OnceCell::new();

/// Where the render service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Base URL, e.g. `http://localhost:3000`. Rendering is unavailable without it.
    pub endpoint: Option<String>,
    pub token: Option<String>,
    #[serde(default = "default_render_timeout")]
    pub timeout_secs: u64,
}

fn default_render_timeout() -> u64 {
    60
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            endpoint: None,
            token: None,
            timeout_secs: default_render_timeout(),
        }
    }
}

/// Record the process-wide engine settings. Later calls are ignored.
pub fn install(settings: RenderSettings) {
    if ENGINE.set(RenderEngine::new(settings)).is_err() {
        debug!("Render engine already installed; keeping existing settings");
    }
}

/// The process-wide engine, if [`install`] was called.
pub fn global() -> Option<&'static RenderEngine> {
    ENGINE.get()
}

/// Drop the process-wide client, if one was created.
pub async fn shutdown() {
    if let Some(engine) = ENGINE.get() {
        engine.shutdown().await;
    }
}

/// Lazily-initialized handle to the render service.
#[derive(Debug)]
pub struct RenderEngine {
    settings: RenderSettings,
    client: Mutex<Option<Arc<BrowserlessClient>>>,
}

impl RenderEngine {
    pub fn new(settings: RenderSettings) -> Self {
        RenderEngine {
            settings,
            client: Mutex::new(None),
        }
    }

    /// Get the client, creating it on first use.
    pub async fn client(&self) -> Result<Arc<BrowserlessClient>, FetchError> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }
        let endpoint = self
            .settings
            .endpoint
            .as_deref()
            .ok_or(FetchError::RenderUnavailable)?;
        let client = Arc::new(BrowserlessClient::new(
            endpoint,
            self.settings.token.as_deref(),
            Duration::from_secs(self.settings.timeout_secs),
        )?);
        info!(endpoint, "Render engine initialized");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    pub async fn is_running(&self) -> bool {
        self.client.lock().await.is_some()
    }

    pub async fn shutdown(&self) {
        if self.client.lock().await.take().is_some() {
            info!("Render engine shut down");
        }
    }

    pub async fn render(&self, url: &str, spec: &RenderSpec) -> Result<String, FetchError> {
        self.client().await?.content(url, spec).await
    }
}

/// HTTP client for the Browserless `/content` API.
#[derive(Debug)]
pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    /// Fetch fully-rendered HTML for `url`, prepared according to `spec`.
    #[instrument(level = "debug", skip(self, spec))]
    pub async fn content(&self, url: &str, spec: &RenderSpec) -> Result<String, FetchError> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let resp = self
            .client
            .post(&endpoint)
            .json(&content_request(url, spec))
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FetchError::Render {
                status: status.as_u16(),
                message,
            });
        }

        resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Request body for `/content`.
fn content_request(url: &str, spec: &RenderSpec) -> serde_json::Value {
    let mut body = serde_json::json!({
        "url": url,
        "gotoOptions": { "waitUntil": "domcontentloaded" },
        "waitForSelector": { "selector": spec.wait_for, "timeout": 30_000 },
    });
    if let Some(script) = spec.script {
        body["addScriptTag"] = serde_json::json!([{ "content": deferred_script(spec.wait_for, script) }]);
    }
    if spec.settle_ms > 0 {
        body["waitForTimeout"] = serde_json::json!(spec.settle_ms);
    }
    body
}

/// Wrap `script` so it only runs once `wait_for` matches.
fn deferred_script(wait_for: &str, script: &str) -> String {
    let selector = serde_json::to_string(wait_for).unwrap_or_else(|_| "\"body\"".into());
    format!(
        "(function(){{var t=setInterval(function(){{if(document.querySelector({selector})){{clearInterval(t);{script}}}}},250);}})();"
    )
}
