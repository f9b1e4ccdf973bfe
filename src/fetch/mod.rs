//! Page retrieval.
//!
//! Adapters never issue requests themselves; the pipeline asks a
//! [`PageFetcher`] for raw HTML, either with a plain GET or through the
//! rendered-page engine for JavaScript-driven listings.
//!
//! - [`WebClient`]: the production fetcher (reqwest + Browserless)
//! - [`render`]: the process-scoped rendered-page engine handle

pub mod http;
pub mod render;

pub use http::WebClient;

use crate::error::FetchError;

/// Per-request knobs an adapter can set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Accept invalid certificate chains.
    pub insecure_tls: bool,
}

/// How a rendered listing must be prepared before its HTML is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSpec {
    /// Selector that must appear before the page counts as loaded.
    pub wait_for: &'static str,
    /// Script run in the page before extraction (e.g. switch sort order).
    pub script: Option<&'static str>,
    /// Extra delay after the script, in milliseconds.
    pub settle_ms: u64,
}

/// Source of raw HTML.
pub trait PageFetcher {
    /// Plain GET. Non-2xx answers are errors.
    async fn fetch(&self, url: &str, opts: FetchOptions) -> Result<String, FetchError>;

    /// Fetch through the rendered-page engine.
    async fn render(&self, url: &str, spec: &RenderSpec) -> Result<String, FetchError>;
}
