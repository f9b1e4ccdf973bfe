//! Model access.
//!
//! [`AskAsync`] is the seam the activity generator talks to. [`OpenAiChat`]
//! implements it against an OpenAI-compatible `/chat/completions` endpoint and
//! [`RetryAsk`] wraps any implementor with bounded exponential backoff:
//! attempt `n` waits `base_delay * 2^(n-1)`, capped at 30 s, plus up to
//! 250 ms of jitter. Only [`ModelError::is_retryable`] errors are retried.

use crate::error::ModelError;
use rand::{Rng, rng};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// A model that answers one prompt at a time.
pub trait AskAsync {
    type Response;

    /// Send `text` as a single user message and return the reply.
    async fn ask(&self, text: &str) -> Result<Self::Response, ModelError>;
}

/// Retries the wrapped model on transient failures.
pub struct RetryAsk<T> {
    inner: T,
    /// Retries after the first attempt; 0 disables retrying.
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        RetryAsk {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn delay_for(&self, retry: usize) -> StdDuration {
        let exp = self.base_delay.saturating_mul(1 << (retry - 1).min(16));
        let jitter = StdDuration::from_millis(rng().random_range(0..=250));
        exp.min(self.max_delay) + jitter
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, ModelError> {
        let started = Instant::now();
        let mut retry = 0usize;

        loop {
            let e = match self.inner.ask(text).await {
                Ok(reply) => return Ok(reply),
                Err(e) => e,
            };
            if !e.is_retryable() || retry >= self.max_retries {
                error!(
                    attempts = retry + 1,
                    retryable = e.is_retryable(),
                    elapsed_ms = started.elapsed().as_millis(),
                    error = %e,
                    "Model call failed"
                );
                return Err(e);
            }

            retry += 1;
            let delay = self.delay_for(retry);
            warn!(retry, max = self.max_retries, ?delay, error = %e, "Model call failed; backing off");
            sleep(delay).await;
        }
    }
}

/// Model endpoint settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub api_base: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_retries: usize,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        ModelSettings {
            api_base: "https://api.openai.com/v1".into(),
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            temperature: 0.4,
            max_tokens: 1000,
            max_retries: 2,
            timeout_secs: 60,
        }
    }
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiChat {
    http: reqwest::Client,
    settings: ModelSettings,
    api_key: String,
}

impl fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("settings", &self.settings)
            .finish()
    }
}

impl OpenAiChat {
    pub fn new(settings: ModelSettings) -> Result<Self, ModelError> {
        let api_key = settings
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::Config("no API key (set model.api_key or OPENAI_API_KEY)".into()))?;
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(OpenAiChat {
            http,
            settings,
            api_key,
        })
    }

    fn headers(&self) -> Result<HeaderMap, ModelError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| ModelError::Config(e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request<'a>(&'a self, text: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: text,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }
}

impl AskAsync for OpenAiChat {
    type Response = String;

    #[instrument(level = "debug", skip_all, fields(model = %self.settings.model))]
    async fn ask(&self, text: &str) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.settings.api_base.trim_end_matches('/'));
        let t0 = Instant::now();

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&self.request(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(elapsed_ms = t0.elapsed().as_millis(), status = status.as_u16(), "API call failed");
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        debug!(elapsed_ms = t0.elapsed().as_millis(), "Model replied");
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ModelError::EmptyResponse)
    }
}

/// The production model: [`OpenAiChat`] behind [`RetryAsk`].
pub fn model_with_backoff(settings: ModelSettings) -> Result<RetryAsk<OpenAiChat>, ModelError> {
    let retries = settings.max_retries;
    Ok(RetryAsk::new(OpenAiChat::new(settings)?, retries, StdDuration::from_secs(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl AskAsync for Flaky {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, ModelError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(ModelError::EmptyResponse)
            } else {
                Ok(format!("echo: {text}"))
            }
        }
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_failures() {
        let api = RetryAsk::new(
            Flaky {
                failures: 2,
                calls: AtomicUsize::new(0),
            },
            3,
            StdDuration::from_millis(10),
        );
        assert_eq!(api.ask("hi").await.unwrap(), "echo: hi");
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_fails_after_one_attempt() {
        let api = RetryAsk::new(
            Flaky {
                failures: 1,
                calls: AtomicUsize::new(0),
            },
            0,
            StdDuration::from_millis(10),
        );
        assert!(api.ask("hi").await.is_err());
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[derive(Debug, Default)]
    struct Unauthorized {
        calls: AtomicUsize,
    }

    impl AskAsync for Unauthorized {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ModelError::Api {
                status: 401,
                message: "bad key".into(),
            })
        }
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let api = RetryAsk::new(Unauthorized::default(), 3, StdDuration::from_millis(10));
        assert!(matches!(api.ask("hi").await, Err(ModelError::Api { status: 401, .. })));
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let api = RetryAsk::new(Unauthorized::default(), 10, StdDuration::from_secs(1));
        let jitter = StdDuration::from_millis(250);
        let first = api.delay_for(1);
        assert!(first >= StdDuration::from_secs(1) && first <= StdDuration::from_secs(1) + jitter);
        let third = api.delay_for(3);
        assert!(third >= StdDuration::from_secs(4) && third <= StdDuration::from_secs(4) + jitter);
        assert!(api.delay_for(10) <= StdDuration::from_secs(30) + jitter);
    }

    #[test]
    fn request_body_carries_sampling_settings() {
        let settings = ModelSettings {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let client = OpenAiChat::new(settings).unwrap();
        let body = serde_json::to_value(client.request("Title: x")).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Title: x");
        assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn debug_output_redacts_key() {
        let settings = ModelSettings {
            api_key: Some("sk-secret".into()),
            ..Default::default()
        };
        assert!(!format!("{settings:?}").contains("sk-secret"));
    }
}
