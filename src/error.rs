//! Error taxonomy for the ingestion and summarization pipelines.
//!
//! Failures are classified by where they happen:
//!
//! - [`FetchError`]: a single listing or detail request failed (network, TLS,
//!   non-2xx, render service). Detail-page failures are dropped per URL.
//! - [`StoreError`]: the document store rejected or could not serve a request.
//!   Domain conditions ([`StoreError::NotFound`], [`StoreError::Conflict`])
//!   carry a status classification for whatever layer exposes them.
//! - [`ModelError`]: the text-generation endpoint failed.
//! - [`ScrapeError`]: one adapter's pipeline failed as a whole.
//! - [`ConfigError`]: the configuration file could not be loaded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("render service error (status {status}): {message}")]
    Render { status: u16, message: String },

    #[error("no render endpoint configured")]
    RenderUnavailable,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no {entity} with id {id} exists")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {detail}")]
    Conflict { entity: &'static str, detail: String },

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    /// HTTP-style classification used by callers that surface store errors.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::Conflict { .. } => 400,
            StoreError::Io(_) | StoreError::Serde(_) => 500,
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no choices")]
    EmptyResponse,

    #[error("invalid model configuration: {0}")]
    Config(String),
}

impl ModelError {
    /// Transport failures, rate limits, server errors and empty replies are
    /// worth another attempt; client errors and bad configuration are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Request(_) | ModelError::EmptyResponse => true,
            ModelError::Api { status, .. } => *status == 429 || *status >= 500,
            ModelError::Config(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("no search term configured for {0}")]
    MissingSearchTerm(String),

    #[error("unknown source {0}")]
    UnknownSource(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
