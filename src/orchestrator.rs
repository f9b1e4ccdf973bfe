//! Runs every adapter concurrently and persists what each one accepted.

use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::models::{Country, Post, SourceKey};
use crate::scrapers::{Adapter, Registry, ScrapeRequest, run_adapter};
use crate::store::{Store, StoreResult};
use crate::window::WindowTimes;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument};

/// Search terms per country, with optional per-publisher overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerms {
    #[serde(default)]
    pub by_country: HashMap<Country, String>,
    /// Keyed by publisher name.
    #[serde(default)]
    pub by_source: HashMap<String, String>,
}

impl SearchTerms {
    pub fn term_for(&self, adapter: &Adapter) -> Option<&str> {
        self.by_source
            .get(adapter.key.publisher)
            .or_else(|| self.by_country.get(&adapter.key.country))
            .map(String::as_str)
    }
}

/// Settled result of one adapter's run.
#[derive(Debug)]
pub struct AdapterOutcome {
    pub key: SourceKey,
    /// Posts actually inserted, or why the adapter failed.
    pub result: Result<Vec<Post>, ScrapeError>,
}

impl AdapterOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Scrape every adapter in `registry` concurrently.
///
/// A failing adapter is reported in its outcome and never affects the
/// others. Each adapter's accepted posts are stored with one bulk insert;
/// a store failure at that point aborts the call.
#[instrument(level = "info", skip_all, fields(adapters = registry.len()))]
pub async fn scrape_all<F: PageFetcher, S: Store>(
    fetcher: &F,
    store: &S,
    registry: &Registry,
    terms: &SearchTerms,
    window: WindowTimes,
) -> StoreResult<Vec<AdapterOutcome>> {
    let runs = registry.iter().map(|adapter| async move {
        let result = match terms.term_for(adapter) {
            Some(term) => {
                let request = ScrapeRequest::new(term).with_window(window);
                run_adapter(fetcher, store, adapter, &request).await
            }
            None => Err(ScrapeError::MissingSearchTerm(adapter.key.to_string())),
        };
        (adapter.key, result)
    });
    let settled = join_all(runs).await;

    let mut outcomes = Vec::with_capacity(settled.len());
    for (key, result) in settled {
        let result = match result {
            Ok(posts) => Ok(persist(store, key, posts).await?),
            Err(e) => {
                error!(source = %key, error = %e, "Adapter failed");
                Err(e)
            }
        };
        outcomes.push(AdapterOutcome { key, result });
    }

    let inserted: usize = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(Vec::len)
        .sum();
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(inserted, failed, "Scrape run complete");
    Ok(outcomes)
}

/// Scrape one publisher end to end and persist its posts.
#[instrument(level = "info", skip_all, fields(source = %key))]
pub async fn scrape_source<F: PageFetcher, S: Store>(
    fetcher: &F,
    store: &S,
    registry: &Registry,
    key: &SourceKey,
    request: &ScrapeRequest,
) -> Result<Vec<Post>, ScrapeError> {
    let adapter = registry
        .get(key)
        .ok_or_else(|| ScrapeError::UnknownSource(key.to_string()))?;
    let posts = run_adapter(fetcher, store, adapter, request).await?;
    Ok(persist(store, *key, posts).await?)
}

async fn persist<S: Store>(store: &S, key: SourceKey, posts: Vec<Post>) -> StoreResult<Vec<Post>> {
    if posts.is_empty() {
        info!(source = %key, "No new posts");
        return Ok(posts);
    }
    let offered = posts.len();
    let inserted = store.insert_posts(posts).await?;
    info!(
        source = %key,
        inserted = inserted.len(),
        skipped = offered - inserted.len(),
        "Stored posts"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, PostFilter};
    use crate::test_support::{StaticFetcher, detail_html, fixture_adapter, listing_html};
    use chrono::{TimeZone, Utc};

    fn window() -> WindowTimes {
        WindowTimes::between(
            Utc.with_ymd_and_hms(2023, 10, 4, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 10, 5, 23, 0, 0).unwrap(),
        )
    }

    fn two_publishers() -> Registry {
        let mut broken = fixture_adapter();
        broken.key.publisher = "Broken Daily";
        broken.base_url = "https://broken.ng";
        Registry::new(vec![fixture_adapter(), broken])
    }

    fn terms() -> SearchTerms {
        SearchTerms {
            by_country: HashMap::from([(Country::Nigeria, "President Tinubu".to_string())]),
            by_source: HashMap::new(),
        }
    }

    fn fetcher() -> StaticFetcher {
        let urls = vec!["https://fixture.ng/a/1".to_string()];
        StaticFetcher::default()
            .page("https://fixture.ng/?s=President+Tinubu", listing_html(&urls))
            .page(&urls[0], detail_html("Tinubu meets governors", "October 5, 2023", "Body"))
            .failing("https://broken.ng/?s=President+Tinubu")
    }

    #[tokio::test]
    async fn failing_adapter_does_not_block_the_others() {
        let store = DocumentStore::in_memory();
        let outcomes = scrape_all(&fetcher(), &store, &two_publishers(), &terms(), window())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        let ok = outcomes.iter().find(|o| o.key.publisher == "Fixture News").unwrap();
        assert_eq!(ok.result.as_ref().unwrap().len(), 1);
        let broken = outcomes.iter().find(|o| o.key.publisher == "Broken Daily").unwrap();
        assert!(matches!(broken.result, Err(ScrapeError::Fetch(_))));

        assert_eq!(store.count_posts(&PostFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_identical_run_inserts_nothing() {
        let store = DocumentStore::in_memory();
        let registry = Registry::new(vec![fixture_adapter()]);
        scrape_all(&fetcher(), &store, &registry, &terms(), window()).await.unwrap();
        let again = scrape_all(&fetcher(), &store, &registry, &terms(), window())
            .await
            .unwrap();
        assert!(again[0].result.as_ref().unwrap().is_empty());
        assert_eq!(store.count_posts(&PostFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_term_is_an_error_outcome() {
        let store = DocumentStore::in_memory();
        let registry = Registry::new(vec![fixture_adapter()]);
        let outcomes = scrape_all(&fetcher(), &store, &registry, &SearchTerms::default(), window())
            .await
            .unwrap();
        assert!(matches!(
            outcomes[0].result,
            Err(ScrapeError::MissingSearchTerm(_))
        ));
    }

    #[test]
    fn source_override_wins_over_country_term() {
        let mut terms = terms();
        terms.by_source.insert("Fixture News".into(), "Tinubu".into());
        assert_eq!(terms.term_for(&fixture_adapter()), Some("Tinubu"));
    }

    #[tokio::test]
    async fn single_source_scrape_persists() {
        let store = DocumentStore::in_memory();
        let registry = Registry::new(vec![fixture_adapter()]);
        let key = fixture_adapter().key;
        let request = ScrapeRequest::new("President Tinubu").with_window(window());
        let posts = scrape_source(&fetcher(), &store, &registry, &key, &request)
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);

        let unknown = SourceKey {
            country: Country::Kenya,
            publisher: "Nobody",
        };
        let err = scrape_source(&fetcher(), &store, &registry, &unknown, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownSource(_)));
    }
}
