//! Acceptance rules applied to every fetched detail page, plus the
//! `(title, source)` dedup guard.

use super::adapter::Adapter;
use super::engine::FetchedPage;
use crate::models::DraftPost;
use crate::store::{Store, StoreResult};
use crate::window::TimeWindow;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Why a page did not become a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingTitleOrContent,
    UnparsedDate,
    OutsideWindow,
    Predicate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::MissingTitleOrContent => "missing title or content",
            Rejection::UnparsedDate => "publish time did not parse",
            Rejection::OutsideWindow => "published outside the window",
            Rejection::Predicate => "rejected by source filter",
        };
        f.write_str(reason)
    }
}

/// An accepted draft with its publish instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub draft: DraftPost,
    pub published_at: DateTime<Utc>,
}

/// Parse one page and decide whether it qualifies.
pub fn normalize(
    adapter: &Adapter,
    page: &FetchedPage,
    window: &TimeWindow,
    now: DateTime<Utc>,
) -> Result<Accepted, Rejection> {
    let parsed = adapter.parse_detail(&page.html, &page.url, now);
    if !parsed.draft.has_title_and_content() {
        return Err(Rejection::MissingTitleOrContent);
    }
    let published_at = parsed.published_at.ok_or(Rejection::UnparsedDate)?;
    if !window.contains(published_at) {
        return Err(Rejection::OutsideWindow);
    }
    if !adapter.accepts(&parsed.draft) {
        return Err(Rejection::Predicate);
    }
    Ok(Accepted {
        draft: parsed.draft,
        published_at,
    })
}

/// `true` if a post with this exact title already exists for the source.
pub async fn already_exists<S: Store>(store: &S, title: &str, source: Uuid) -> StoreResult<bool> {
    Ok(store.find_post(title, source).await?.is_some())
}
