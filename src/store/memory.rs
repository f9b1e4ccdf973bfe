//! In-memory document store with optional JSON snapshots.
//!
//! All collections live behind one async `RwLock`. When opened on a
//! directory, the whole store is serialized to `{dir}/statewatch.json` after
//! every write (write to a temp file, then rename), and reloaded on open.
//! A write changes a copy of the collections; the copy replaces the live
//! state only once its snapshot is on disk.
//!
//! # Snapshot layout
//!
//! ```text
//! store_dir/
//! └── statewatch.json   # { "sources": [...], "posts": [...], "categories": [...], "activities": [...] }
//! ```

use super::{ActivityFilter, Page, PostFilter, SourceFilter, Store, StoreResult};
use crate::error::StoreError;
use crate::models::{Activity, Category, Country, NewSource, Post, PostStatus, Source};
use crate::utils::ensure_writable_dir;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const SNAPSHOT_FILE: &str = "statewatch.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    activities: Vec<Activity>,
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    data: RwLock<Collections>,
    snapshot: Option<PathBuf>,
}

impl DocumentStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        DocumentStore::default()
    }

    /// Open (or create) a store snapshotted under `dir`.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = dir.as_ref();
        ensure_writable_dir(&dir.to_string_lossy()).await?;
        let path = dir.join(SNAPSHOT_FILE);

        let data = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Collections>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => return Err(e.into()),
        };
        info!(
            sources = data.sources.len(),
            posts = data.posts.len(),
            categories = data.categories.len(),
            activities = data.activities.len(),
            path = %path.display(),
            "Loaded store snapshot"
        );

        Ok(DocumentStore {
            data: RwLock::new(data),
            snapshot: Some(path),
        })
    }

    /// Apply `change` under the write lock and keep the result only if the
    /// snapshot (when there is one) was written.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut Collections) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut data = self.data.write().await;
        if self.snapshot.is_none() {
            return change(&mut *data);
        }
        let mut next = data.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *data = next;
        Ok(out)
    }

    async fn persist(&self, data: &Collections) -> StoreResult<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let json = serde_json::to_vec(data)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "Wrote store snapshot");
        Ok(())
    }
}

fn matches_search(haystack: &str, needle: &Option<String>) -> bool {
    needle
        .as_ref()
        .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn paginate<T: Clone>(items: Vec<&T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip)
        .take(page.limit)
        .cloned()
        .collect()
}

fn post_matches(post: &Post, filter: &PostFilter) -> bool {
    !post.is_deleted
        && filter.source.is_none_or(|s| post.source == s)
        && filter.status.is_none_or(|s| post.status == s)
        && filter.processed.is_none_or(|p| post.is_processed == p)
        && filter.country.is_none_or(|c| post.country == c)
        && matches_search(&post.title, &filter.search)
}

impl Store for DocumentStore {
    async fn find_source(&self, name: &str, country: Country) -> StoreResult<Option<Source>> {
        let data = self.data.read().await;
        Ok(data
            .sources
            .iter()
            .find(|s| s.name == name && s.country == country)
            .cloned())
    }

    async fn create_source(&self, source: NewSource) -> StoreResult<Source> {
        self.commit(|data| {
            if data
                .sources
                .iter()
                .any(|s| s.name == source.name && s.country == source.country)
            {
                return Err(StoreError::Conflict {
                    entity: "source",
                    detail: format!("{} ({})", source.name, source.country),
                });
            }
            let now = Utc::now();
            let created = Source {
                id: Uuid::new_v4(),
                name: source.name,
                search_url: source.search_url,
                country: source.country,
                image: source.image,
                is_deleted: false,
                created_at: now,
                updated_at: now,
            };
            data.sources.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn list_sources(&self, filter: &SourceFilter, page: Page) -> StoreResult<Vec<Source>> {
        let data = self.data.read().await;
        let mut found: Vec<&Source> = data
            .sources
            .iter()
            .filter(|s| {
                !s.is_deleted
                    && filter.country.is_none_or(|c| s.country == c)
                    && matches_search(&s.name, &filter.search)
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(found, page))
    }

    async fn update_source_image(&self, id: Uuid, image: Option<String>) -> StoreResult<Source> {
        self.commit(|data| {
            let source = data
                .sources
                .iter_mut()
                .find(|s| s.id == id && !s.is_deleted)
                .ok_or_else(|| StoreError::not_found("source", id))?;
            source.image = image;
            source.updated_at = Utc::now();
            Ok(source.clone())
        })
        .await
    }

    async fn soft_delete_sources(&self, ids: &[Uuid]) -> StoreResult<usize> {
        self.commit(|data| {
            let mut n = 0;
            for source in data.sources.iter_mut().filter(|s| ids.contains(&s.id)) {
                source.is_deleted = true;
                n += 1;
            }
            Ok(n)
        })
        .await
    }

    async fn find_post(&self, title: &str, source: Uuid) -> StoreResult<Option<Post>> {
        let data = self.data.read().await;
        Ok(data
            .posts
            .iter()
            .find(|p| !p.is_deleted && p.source == source && p.title == title)
            .cloned())
    }

    async fn get_post(&self, id: Uuid) -> StoreResult<Post> {
        let data = self.data.read().await;
        data.posts
            .iter()
            .find(|p| p.id == id && !p.is_deleted)
            .cloned()
            .ok_or_else(|| StoreError::not_found("post", id))
    }

    async fn list_posts(&self, filter: &PostFilter, page: Page) -> StoreResult<Vec<Post>> {
        let data = self.data.read().await;
        let mut found: Vec<&Post> = data.posts.iter().filter(|p| post_matches(p, filter)).collect();
        found.sort_by_key(|p| Reverse(p.published_at));
        Ok(paginate(found, page))
    }

    async fn count_posts(&self, filter: &PostFilter) -> StoreResult<usize> {
        let data = self.data.read().await;
        Ok(data.posts.iter().filter(|p| post_matches(p, filter)).count())
    }

    async fn insert_posts(&self, posts: Vec<Post>) -> StoreResult<Vec<Post>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        self.commit(|data| {
            let mut seen: HashSet<(String, Uuid)> = data
                .posts
                .iter()
                .filter(|p| !p.is_deleted)
                .map(|p| (p.title.clone(), p.source))
                .collect();

            let mut inserted = Vec::with_capacity(posts.len());
            for post in posts {
                if !seen.insert((post.title.clone(), post.source)) {
                    debug!(title = %post.title, source = %post.source, "Post already exists; skipping insert");
                    continue;
                }
                inserted.push(post);
            }
            data.posts.extend(inserted.iter().cloned());
            Ok(inserted)
        })
        .await
    }

    async fn update_post_status(&self, id: Uuid, status: PostStatus) -> StoreResult<Post> {
        self.commit(|data| {
            let post = data
                .posts
                .iter_mut()
                .find(|p| p.id == id && !p.is_deleted)
                .ok_or_else(|| StoreError::not_found("post", id))?;
            post.status = status;
            post.updated_at = Utc::now();
            Ok(post.clone())
        })
        .await
    }

    async fn mark_posts_processed(&self, ids: &[Uuid]) -> StoreResult<usize> {
        let now = Utc::now();
        self.commit(|data| {
            let mut n = 0;
            for post in data
                .posts
                .iter_mut()
                .filter(|p| !p.is_deleted && ids.contains(&p.id))
            {
                post.is_processed = true;
                post.updated_at = now;
                n += 1;
            }
            Ok(n)
        })
        .await
    }

    async fn soft_delete_posts(&self, ids: &[Uuid]) -> StoreResult<usize> {
        self.commit(|data| {
            let mut n = 0;
            for post in data.posts.iter_mut().filter(|p| ids.contains(&p.id)) {
                post.is_deleted = true;
                n += 1;
            }
            Ok(n)
        })
        .await
    }

    async fn list_categories(&self, page: Page) -> StoreResult<Vec<Category>> {
        let data = self.data.read().await;
        let mut found: Vec<&Category> = data.categories.iter().filter(|c| !c.is_deleted).collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(found, page))
    }

    async fn create_category(&self, name: &str, emoji: Option<&str>) -> StoreResult<Category> {
        {
            let data = self.data.read().await;
            if let Some(existing) = data.categories.iter().find(|c| c.name == name && !c.is_deleted) {
                debug!(%name, "Category already exists; returning existing");
                return Ok(existing.clone());
            }
        }
        self.commit(|data| {
            // Another writer may have created it since the read.
            if let Some(existing) = data.categories.iter().find(|c| c.name == name && !c.is_deleted) {
                return Ok(existing.clone());
            }
            let category = Category {
                id: Uuid::new_v4(),
                name: name.to_string(),
                emoji: emoji.map(str::to_string),
                is_deleted: false,
            };
            data.categories.push(category.clone());
            Ok(category)
        })
        .await
    }

    async fn insert_activities(&self, activities: Vec<Activity>) -> StoreResult<Vec<Activity>> {
        if activities.is_empty() {
            return Ok(Vec::new());
        }
        self.commit(|data| {
            data.activities.extend(activities.iter().cloned());
            Ok(())
        })
        .await?;
        Ok(activities)
    }

    async fn list_activities(
        &self,
        filter: &ActivityFilter,
        page: Page,
    ) -> StoreResult<Vec<Activity>> {
        let data = self.data.read().await;
        let mut found: Vec<&Activity> = data
            .activities
            .iter()
            .filter(|a| {
                !a.is_deleted
                    && filter.category.is_none_or(|c| a.categories.contains(&c))
                    && filter.published.is_none_or(|p| a.is_published == p)
                    && filter.country.is_none_or(|c| a.country == c)
                    && matches_search(&a.title, &filter.search)
            })
            .collect();
        found.sort_by_key(|a| Reverse(a.date));
        Ok(paginate(found, page))
    }

    async fn set_activity_published(&self, id: Uuid, published: bool) -> StoreResult<Activity> {
        self.commit(|data| {
            let activity = data
                .activities
                .iter_mut()
                .find(|a| a.id == id && !a.is_deleted)
                .ok_or_else(|| StoreError::not_found("activity", id))?;
            activity.is_published = published;
            Ok(activity.clone())
        })
        .await
    }

    async fn soft_delete_activities(&self, ids: &[Uuid]) -> StoreResult<usize> {
        self.commit(|data| {
            let mut n = 0;
            for activity in data.activities.iter_mut().filter(|a| ids.contains(&a.id)) {
                activity.is_deleted = true;
                n += 1;
            }
            Ok(n)
        })
        .await
    }
}
