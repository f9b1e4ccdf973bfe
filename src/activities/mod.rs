//! Activity generation: summarize approved posts and tag them with categories.
//!
//! One batch runs in four steps:
//!
//! 1. **Prompting**: ask the model about every post concurrently ([`prompt`])
//! 2. **Parsing**: pull summary and category names out of each reply ([`parse`])
//! 3. **Resolving**: map names to category ids sequentially, creating missing
//!    categories once per batch ([`categories`])
//! 4. **Persisting**: mark every input post processed, then insert the activities
//!
//! A failed model call or a reply with the wrong shape costs only that post's
//! activity; the post is still marked processed.

pub mod categories;
pub mod parse;
pub mod prompt;

use crate::api::AskAsync;
use crate::models::{Activity, Post};
use crate::store::{Page, Store, StoreResult};
use crate::utils::truncate_for_log;
use categories::CategoryResolver;
use chrono::Utc;
use futures::future::join_all;
use parse::{ParsedReply, parse_reply};
use prompt::activity_prompt;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Summarize `posts` and persist the resulting activities.
///
/// Returns the activities inserted. Store failures propagate; model failures
/// do not.
#[instrument(level = "info", skip_all, fields(posts = posts.len()))]
pub async fn generate_activities<M, S>(model: &M, store: &S, posts: Vec<Post>) -> StoreResult<Vec<Activity>>
where
    M: AskAsync<Response = String>,
    S: Store,
{
    if posts.is_empty() {
        info!("No posts to summarize");
        return Ok(Vec::new());
    }

    let replies = join_all(posts.iter().map(|post| ask_about(model, post))).await;

    let mut resolver = CategoryResolver::new(store.list_categories(Page::all()).await?);
    let now = Utc::now();
    let mut activities = Vec::new();
    for (post, reply) in posts.iter().zip(replies) {
        let Some(reply) = reply else { continue };
        let category_ids = resolver.resolve(store, &reply.categories).await?;
        activities.push(activity_for(post, reply.summary, category_ids, now));
    }

    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let processed = store.mark_posts_processed(&ids).await?;
    let inserted = store.insert_activities(activities).await?;
    info!(
        processed,
        activities = inserted.len(),
        skipped = posts.len() - inserted.len(),
        "Generated activities"
    );
    Ok(inserted)
}

/// Prompt the model about one post. `None` on failure or a malformed reply.
async fn ask_about<M: AskAsync<Response = String>>(model: &M, post: &Post) -> Option<ParsedReply> {
    let reply = match model.ask(&activity_prompt(post)).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(post = %post.id, error = %e, "Model call failed; skipping post");
            return None;
        }
    };
    match parse_reply(&reply) {
        Some(parsed) => {
            debug!(post = %post.id, categories = ?parsed.categories, "Parsed reply");
            Some(parsed)
        }
        None => {
            warn!(
                post = %post.id,
                reply_preview = %truncate_for_log(&reply, 300),
                "Model reply did not match the expected shape; skipping post"
            );
            None
        }
    }
}

fn activity_for(post: &Post, summary: String, categories: Vec<Uuid>, now: chrono::DateTime<Utc>) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        title: post.title.clone(),
        summary,
        post: post.id,
        categories,
        date: post.published_at,
        is_published: false,
        country: post.country,
        is_deleted: false,
        created_at: now,
    }
}
