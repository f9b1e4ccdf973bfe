//! Entry points for the external scheduler.
//!
//! The scheduler fires summaries at 06:00, 12:00, 18:00 and 23:30 and
//! scrapes at 06:30, 12:30, 18:30 and 23:59 in the job timezone; each firing
//! calls one of these functions with the trigger instant.

use crate::activities::generate_activities;
use crate::api::AskAsync;
use crate::fetch::PageFetcher;
use crate::models::{Activity, PostStatus};
use crate::orchestrator::{AdapterOutcome, SearchTerms, scrape_all};
use crate::scrapers::Registry;
use crate::store::{Page, PostFilter, Store, StoreResult};
use crate::window::WindowTimes;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument};

/// Scrape every publisher for posts published since the start of the
/// trigger's day in `tz`, up to the trigger instant.
#[instrument(level = "info", skip_all, fields(now = %now, tz = %tz))]
pub async fn scheduled_scrape<F: PageFetcher, S: Store>(
    fetcher: &F,
    store: &S,
    registry: &Registry,
    terms: &SearchTerms,
    tz: Tz,
    now: DateTime<Utc>,
) -> StoreResult<Vec<AdapterOutcome>> {
    let window = WindowTimes::day_until(now, tz);
    scrape_all(fetcher, store, registry, terms, window).await
}

/// Summarize up to `batch_size` approved posts that have not been processed.
#[instrument(level = "info", skip_all, fields(batch_size = batch_size))]
pub async fn scheduled_summarize<M, S>(model: &M, store: &S, batch_size: usize) -> StoreResult<Vec<Activity>>
where
    M: AskAsync<Response = String>,
    S: Store,
{
    let posts = store.list_posts(&pending_summaries(), Page::first(batch_size)).await?;
    info!(count = posts.len(), "Loaded posts awaiting summary");
    generate_activities(model, store, posts).await
}

/// Approved posts that have not been summarized.
pub fn pending_summaries() -> PostFilter {
    PostFilter {
        status: Some(PostStatus::Approved),
        processed: Some(false),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use crate::test_support::{
        ScriptedModel, StaticFetcher, detail_html, fixture_adapter, listing_html, post_for,
        source_named,
    };
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[tokio::test]
    async fn summarize_takes_only_approved_unprocessed_posts() {
        let store = DocumentStore::in_memory();
        let source = source_named(&store, "Vanguard").await;
        let mut approved = post_for(&source, "Approved");
        approved.status = PostStatus::Approved;
        let pending = post_for(&source, "Pending");
        let mut done = post_for(&source, "Done");
        done.status = PostStatus::Approved;
        done.is_processed = true;
        store.insert_posts(vec![approved, pending, done]).await.unwrap();

        let model = ScriptedModel::default()
            .reply("Approved", "|Summary: ok|Categories: policy|")
            .reply("Pending", "|Summary: no|Categories: policy|")
            .reply("Done", "|Summary: no|Categories: policy|");
        let activities = scheduled_summarize(&model, &store, 100).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].title, "Approved");

        // Nothing left for the next run.
        assert!(scheduled_summarize(&model, &store, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summarize_respects_batch_size() {
        let store = DocumentStore::in_memory();
        let source = source_named(&store, "Vanguard").await;
        let posts = (0..5)
            .map(|i| {
                let mut p = post_for(&source, &format!("Post {i}"));
                p.status = PostStatus::Approved;
                p
            })
            .collect();
        store.insert_posts(posts).await.unwrap();

        let model = ScriptedModel::default().reply("Post", "|Summary: ok|Categories: media|");
        assert_eq!(scheduled_summarize(&model, &store, 2).await.unwrap().len(), 2);
        let left = store.count_posts(&pending_summaries()).await.unwrap();
        assert_eq!(left, 3);
    }

    #[tokio::test]
    async fn scrape_window_runs_from_local_midnight_to_trigger() {
        let urls = vec![
            "https://fixture.ng/a/1".to_string(),
            "https://fixture.ng/a/2".to_string(),
        ];
        let fetcher = StaticFetcher::default()
            .page("https://fixture.ng/?s=President+Tinubu", listing_html(&urls))
            .page(&urls[0], detail_html("Today in Lagos", "October 5, 2023", "Body"))
            .page(&urls[1], detail_html("Yesterday", "October 4, 2023", "Body"));
        let store = DocumentStore::in_memory();
        let registry = Registry::new(vec![fixture_adapter()]);
        let terms = SearchTerms {
            by_country: HashMap::from([(crate::models::Country::Nigeria, "President Tinubu".into())]),
            by_source: HashMap::new(),
        };
        // 06:30 in Lagos.
        let trigger = Utc.with_ymd_and_hms(2023, 10, 5, 5, 30, 0).unwrap();

        let outcomes = scheduled_scrape(
            &fetcher,
            &store,
            &registry,
            &terms,
            chrono_tz::Africa::Lagos,
            trigger,
        )
        .await
        .unwrap();
        let posts = outcomes[0].result.as_ref().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Today in Lagos");
    }
}
