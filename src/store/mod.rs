//! Persistence seam.
//!
//! The pipelines talk to storage only through the [`Store`] trait: a small
//! document-store surface over the four collections (sources, posts,
//! categories, activities) with field filters, skip/limit pagination, bulk
//! insert and bulk update. Soft-deleted records are invisible to every query.
//!
//! [`DocumentStore`] is the bundled implementation: an in-memory store that can
//! optionally snapshot itself to a JSON file after every write.
//!
//! Two uniqueness rules are enforced at insert time so concurrent runs cannot
//! duplicate records:
//! - posts are unique on `(title, source)`; conflicting inserts are skipped
//! - categories are unique on `name`; a conflicting create returns the
//!   existing category

pub mod memory;

pub use memory::DocumentStore;

use crate::error::StoreError;
use crate::models::{Activity, Category, Country, NewSource, Post, PostStatus, Source};
use uuid::Uuid;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Skip/limit pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    /// `page` is 1-based.
    pub fn new(page: usize, limit: usize) -> Self {
        Page {
            skip: page.saturating_sub(1) * limit,
            limit,
        }
    }

    pub fn first(limit: usize) -> Self {
        Page { skip: 0, limit }
    }

    pub fn all() -> Self {
        Page {
            skip: 0,
            limit: usize::MAX,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(1, 10)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    pub country: Option<Country>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub source: Option<Uuid>,
    pub status: Option<PostStatus>,
    pub processed: Option<bool>,
    pub country: Option<Country>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub category: Option<Uuid>,
    pub published: Option<bool>,
    pub country: Option<Country>,
    pub search: Option<String>,
}

/// Abstract document store consumed by the pipelines.
///
/// List operations sort newest first (posts by `published_at`, activities by
/// `date`) except sources and categories, which sort by name.
pub trait Store {
    async fn find_source(&self, name: &str, country: Country) -> StoreResult<Option<Source>>;
    /// Fails with [`StoreError::Conflict`] if `(name, country)` exists.
    async fn create_source(&self, source: NewSource) -> StoreResult<Source>;
    async fn list_sources(&self, filter: &SourceFilter, page: Page) -> StoreResult<Vec<Source>>;
    async fn update_source_image(&self, id: Uuid, image: Option<String>) -> StoreResult<Source>;
    async fn soft_delete_sources(&self, ids: &[Uuid]) -> StoreResult<usize>;

    /// Exact `(title, source)` lookup used by the dedup guard.
    async fn find_post(&self, title: &str, source: Uuid) -> StoreResult<Option<Post>>;
    async fn get_post(&self, id: Uuid) -> StoreResult<Post>;
    async fn list_posts(&self, filter: &PostFilter, page: Page) -> StoreResult<Vec<Post>>;
    async fn count_posts(&self, filter: &PostFilter) -> StoreResult<usize>;
    /// Bulk insert; posts whose `(title, source)` already exists are skipped.
    /// Returns the posts actually inserted.
    async fn insert_posts(&self, posts: Vec<Post>) -> StoreResult<Vec<Post>>;
    async fn update_post_status(&self, id: Uuid, status: PostStatus) -> StoreResult<Post>;
    async fn mark_posts_processed(&self, ids: &[Uuid]) -> StoreResult<usize>;
    async fn soft_delete_posts(&self, ids: &[Uuid]) -> StoreResult<usize>;

    async fn list_categories(&self, page: Page) -> StoreResult<Vec<Category>>;
    /// Create a category, or return the existing one with the same name.
    async fn create_category(&self, name: &str, emoji: Option<&str>) -> StoreResult<Category>;

    async fn insert_activities(&self, activities: Vec<Activity>) -> StoreResult<Vec<Activity>>;
    async fn list_activities(
        &self,
        filter: &ActivityFilter,
        page: Page,
    ) -> StoreResult<Vec<Activity>>;
    async fn set_activity_published(&self, id: Uuid, published: bool) -> StoreResult<Activity>;
    async fn soft_delete_activities(&self, ids: &[Uuid]) -> StoreResult<usize>;
}
