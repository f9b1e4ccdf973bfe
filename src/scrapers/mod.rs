//! Head-of-state news scraping.
//!
//! Every publisher is described by a declarative [`Adapter`]; one generic
//! pipeline ([`run_adapter`]) turns an adapter and a [`ScrapeRequest`] into
//! accepted, not-yet-persisted posts:
//!
//! 1. **Source**: find or create the persisted source ([`registry::ensure_source`])
//! 2. **Indexing**: fetch the listing and extract detail URLs ([`engine`])
//! 3. **Fetching**: fetch all detail pages concurrently, dropping failures
//! 4. **Normalizing**: parse, sanitize, window and predicate checks ([`normalize`])
//! 5. **Dedup**: skip titles the source already has
//!
//! # Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`adapter`] | Adapter record, link resolution, detail extraction |
//! | [`dates`] | Publisher-local publish-time parsing |
//! | [`engine`] | Listing to detail fan-out |
//! | [`normalize`] | Acceptance rules and dedup guard |
//! | [`registry`] | Adapter lookup and lazy source creation |
//! | [`sources`] | The bundled publishers, by country |

pub mod adapter;
pub mod dates;
pub mod engine;
pub mod normalize;
pub mod registry;
pub mod sources;

pub use adapter::Adapter;
pub use registry::{Registry, ensure_source};

use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::models::Post;
use crate::store::Store;
use crate::window::{TimeWindow, WindowTimes};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// What to search for and which publish times qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub term: String,
    /// 1-based results page; `None` is the first page.
    pub page: Option<u32>,
    pub window: WindowTimes,
}

impl ScrapeRequest {
    pub fn new(term: impl Into<String>) -> Self {
        ScrapeRequest {
            term: term.into(),
            page: None,
            window: WindowTimes::default(),
        }
    }

    pub fn with_window(mut self, window: WindowTimes) -> Self {
        self.window = window;
        self
    }

    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }
}

/// Run one adapter end to end, returning the posts it accepted.
///
/// Nothing is persisted except the source record on first use. A listing
/// failure or a store failure fails the run; per-page problems only shrink
/// the result.
#[instrument(level = "info", skip_all, fields(source = %adapter.key, term = %request.term))]
pub async fn run_adapter<F: PageFetcher, S: Store>(
    fetcher: &F,
    store: &S,
    adapter: &Adapter,
    request: &ScrapeRequest,
) -> Result<Vec<Post>, ScrapeError> {
    let source = ensure_source(store, adapter).await?;
    let listing_url = adapter.listing_url(&source.search_url, &request.term, request.page);
    let pages = engine::collect_pages(fetcher, adapter, &listing_url).await?;

    let now = Utc::now();
    let window = TimeWindow::resolve(request.window, adapter.timezone, now);
    let mut seen = HashSet::new();
    let mut posts = Vec::new();

    for page in &pages {
        let accepted = match normalize::normalize(adapter, page, &window, now) {
            Ok(accepted) => accepted,
            Err(reason) => {
                debug!(url = %page.url, %reason, "Page rejected");
                continue;
            }
        };
        if !seen.insert(accepted.draft.title.clone())
            || normalize::already_exists(store, &accepted.draft.title, source.id).await?
        {
            debug!(url = %page.url, title = %accepted.draft.title, "Post already exists");
            continue;
        }
        posts.push(Post::from_draft(accepted.draft, &source, accepted.published_at, now));
    }

    info!(
        fetched = pages.len(),
        accepted = posts.len(),
        start = %window.start,
        end = %window.end,
        "Normalized pages"
    );
    Ok(posts)
}
