//! Production [`PageFetcher`] backed by reqwest and the render engine.

use super::render::{self, RenderEngine};
use super::{FetchOptions, PageFetcher, RenderSpec};
use crate::error::FetchError;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches pages over HTTP with a bounded per-request timeout.
///
/// Holds two clients because certificate verification is a client-level
/// setting in reqwest: adapters with broken chains use the lenient one.
#[derive(Debug, Clone)]
pub struct WebClient {
    strict: reqwest::Client,
    lenient: reqwest::Client,
}

impl WebClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let strict = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        let lenient = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(FetchError::Client)?;
        Ok(WebClient { strict, lenient })
    }

    fn engine(&self) -> Result<&'static RenderEngine, FetchError> {
        render::global().ok_or(FetchError::RenderUnavailable)
    }
}

impl PageFetcher for WebClient {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str, opts: FetchOptions) -> Result<String, FetchError> {
        let client = if opts.insecure_tls {
            &self.lenient
        } else {
            &self.strict
        };
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let resp = client.get(url).send().await.map_err(request_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(request_error)?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }

    #[instrument(level = "debug", skip(self, spec))]
    async fn render(&self, url: &str, spec: &RenderSpec) -> Result<String, FetchError> {
        self.engine()?.render(url, spec).await
    }
}
