//! Listing to detail fan-out.

use super::adapter::{Adapter, FetchStrategy};
use crate::error::{FetchError, ScrapeError};
use crate::fetch::PageFetcher;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

/// One detail page that fetched successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

/// Fetch the listing with the adapter's strategy.
pub async fn fetch_listing<F: PageFetcher>(
    fetcher: &F,
    adapter: &Adapter,
    url: &str,
) -> Result<String, FetchError> {
    match adapter.fetch {
        FetchStrategy::Http => fetcher.fetch(url, adapter.fetch_options()).await,
        FetchStrategy::Rendered(ref spec) => fetcher.render(url, spec).await,
    }
}

/// Fetch every detail URL concurrently, settling each independently.
///
/// The result keeps one entry per input URL, in input order, each paired
/// with its own outcome.
pub async fn fetch_details<F: PageFetcher>(
    fetcher: &F,
    adapter: &Adapter,
    urls: Vec<String>,
) -> Vec<(String, Result<String, FetchError>)> {
    let opts = adapter.fetch_options();
    let results = join_all(urls.iter().map(|url| fetcher.fetch(url, opts))).await;
    urls.into_iter().zip(results).collect()
}

/// Listing fetch, link extraction and detail fan-out for one adapter.
///
/// Only the listing step can fail the whole run; detail failures are logged
/// and dropped.
#[instrument(level = "info", skip_all, fields(source = %adapter.key, listing_url = %listing_url))]
pub async fn collect_pages<F: PageFetcher>(
    fetcher: &F,
    adapter: &Adapter,
    listing_url: &str,
) -> Result<Vec<FetchedPage>, ScrapeError> {
    let listing = fetch_listing(fetcher, adapter, listing_url).await?;
    let urls = adapter.extract_detail_urls(&listing)?;
    info!(count = urls.len(), "Indexed detail URLs");
    debug!(urls = ?urls, "Detail URLs");

    let settled = fetch_details(fetcher, adapter, urls).await;
    let total = settled.len();
    let pages: Vec<FetchedPage> = settled
        .into_iter()
        .filter_map(|(url, result)| match result {
            Ok(html) => Some(FetchedPage { url, html }),
            Err(e) => {
                warn!(error = %e, %url, "Detail fetch failed; skipping");
                None
            }
        })
        .collect();

    info!(fetched = pages.len(), failed = total - pages.len(), "Fetched detail pages");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StaticFetcher, fixture_adapter, listing_html};

    #[tokio::test]
    async fn failed_details_do_not_abort_siblings() {
        let adapter = fixture_adapter();
        let urls: Vec<String> = (0..10).map(|i| format!("https://fixture.ng/a/{i}")).collect();
        let mut fetcher = StaticFetcher::default()
            .page("https://fixture.ng/search", listing_html(&urls));
        for (i, url) in urls.iter().enumerate() {
            fetcher = if i % 3 == 1 {
                fetcher.failing(url)
            } else {
                fetcher.page(url, format!("<p>{i}</p>"))
            };
        }

        let pages = collect_pages(&fetcher, &adapter, "https://fixture.ng/search")
            .await
            .unwrap();
        assert_eq!(pages.len(), 7);
        assert!(pages.iter().all(|p| !p.url.ends_with("/1")));
        // Each page is paired with its own URL.
        for page in &pages {
            let i = page.url.rsplit('/').next().unwrap();
            assert_eq!(page.html, format!("<p>{i}</p>"));
        }
    }

    #[tokio::test]
    async fn listing_failure_fails_the_run() {
        let adapter = fixture_adapter();
        let fetcher = StaticFetcher::default().failing("https://fixture.ng/search");
        let err = collect_pages(&fetcher, &adapter, "https://fixture.ng/search")
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(_)));
    }

    #[tokio::test]
    async fn rendered_adapter_uses_render_path() {
        let adapter = fixture_adapter().rendered(crate::fetch::RenderSpec {
            wait_for: ".results",
            script: None,
            settle_ms: 0,
        });
        let fetcher = StaticFetcher::default()
            .rendered_page("https://fixture.ng/search", listing_html(&[]));
        let pages = collect_pages(&fetcher, &adapter, "https://fixture.ng/search")
            .await
            .unwrap();
        assert!(pages.is_empty());
    }
}
