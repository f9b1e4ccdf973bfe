//! Declarative per-publisher scraping configuration.
//!
//! An [`Adapter`] is plain data: selectors, a query builder, a publish-time
//! format and a few flags. One generic pipeline ([`super::run_adapter`])
//! consumes every adapter; publishers with irregular detail markup plug in a
//! [`DetailParser::Custom`] function instead of selectors.

use super::dates::PublishTime;
use crate::error::ScrapeError;
use crate::fetch::{FetchOptions, RenderSpec};
use crate::models::{Country, DraftPost, SourceKey};
use crate::utils::sanitize_text;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// Builds the query appended to the source's search URL from a search term
/// and an optional 1-based result page.
pub type QueryBuilder = fn(term: &str, page: Option<u32>) -> String;

/// Publisher-specific relevance filter.
pub type ContentPredicate = fn(&DraftPost) -> bool;

/// Hand-written detail extraction for irregular markup.
pub type CustomDetail = fn(&Html) -> RawDetail;

/// Where detail links live on a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    /// One match per result.
    pub items: &'static str,
    /// Anchor inside each item; its `href` is the detail URL.
    pub link: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Http,
    Rendered(RenderSpec),
}

/// Selector-driven detail extraction.
///
/// Title and date take the first match; the body concatenates the text of
/// every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailSelectors {
    pub title: &'static str,
    pub date: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub enum DetailParser {
    Selectors(DetailSelectors),
    Custom(CustomDetail),
}

/// Unsanitized text pulled from a detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDetail {
    pub title: String,
    pub date: String,
    pub body: String,
}

/// A detail page after extraction: the draft and its publish instant, if
/// the date parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDetail {
    pub draft: DraftPost,
    pub published_at: Option<DateTime<Utc>>,
}

/// Everything needed to scrape one publisher.
#[derive(Debug, Clone)]
pub struct Adapter {
    pub key: SourceKey,
    pub base_url: &'static str,
    pub timezone: Tz,
    pub search: QueryBuilder,
    pub listing: Listing,
    pub fetch: FetchStrategy,
    pub detail: DetailParser,
    pub publish_time: PublishTime,
    pub predicate: Option<ContentPredicate>,
    pub insecure_tls: bool,
    /// Prepended to root-relative detail links.
    pub url_prefix: Option<&'static str>,
}

impl Adapter {
    /// A plain-HTTP adapter in the country's home timezone.
    pub fn new(
        country: Country,
        publisher: &'static str,
        base_url: &'static str,
        search: QueryBuilder,
        listing: Listing,
        detail: DetailParser,
        publish_time: PublishTime,
    ) -> Self {
        Adapter {
            key: SourceKey { country, publisher },
            base_url,
            timezone: country.timezone(),
            search,
            listing,
            fetch: FetchStrategy::Http,
            detail,
            publish_time,
            predicate: None,
            insecure_tls: false,
            url_prefix: None,
        }
    }

    pub fn with_predicate(mut self, predicate: ContentPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn rendered(mut self, spec: RenderSpec) -> Self {
        self.fetch = FetchStrategy::Rendered(spec);
        self
    }

    pub fn insecure_tls(mut self) -> Self {
        self.insecure_tls = true;
        self
    }

    pub fn with_url_prefix(mut self, prefix: &'static str) -> Self {
        self.url_prefix = Some(prefix);
        self
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            insecure_tls: self.insecure_tls,
        }
    }

    /// Full listing URL for `term` against the persisted source's search URL.
    pub fn listing_url(&self, search_url: &str, term: &str, page: Option<u32>) -> String {
        format!("{}{}", search_url.trim_end_matches('/'), (self.search)(term, page))
    }

    /// Detail URLs in document order, one per listing item that has a link.
    pub fn extract_detail_urls(&self, html: &str) -> Result<Vec<String>, ScrapeError> {
        let document = Html::parse_document(html);
        let items = selector(self.listing.items)?;
        let link = selector(self.listing.link)?;

        let urls = document
            .select(&items)
            .filter_map(|item| item.select(&link).next())
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| self.resolve_link(href))
            .collect();
        Ok(urls)
    }

    /// Turn an `href` into an absolute URL.
    pub fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        if let Ok(absolute) = Url::parse(href) {
            return Some(absolute.to_string());
        }
        if let Some(prefix) = self.url_prefix {
            return Some(format!("{}{}", prefix.trim_end_matches('/'), href));
        }
        Url::parse(self.base_url)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .ok()
    }

    /// Extract a draft and its publish time from one detail page.
    ///
    /// Never fails: unmatched selectors leave fields empty and an unparsable
    /// date leaves `published_at` unset.
    pub fn parse_detail(&self, html: &str, url: &str, now: DateTime<Utc>) -> ParsedDetail {
        let document = Html::parse_document(html);
        let raw = match self.detail {
            DetailParser::Selectors(sel) => RawDetail {
                title: first_text(&document, sel.title),
                date: first_text(&document, sel.date),
                body: all_text(&document, sel.body),
            },
            DetailParser::Custom(parse) => parse(&document),
        };

        let published_at = self.publish_time.parse(&raw.date, self.timezone, now);
        ParsedDetail {
            draft: DraftPost {
                title: sanitize_text(&raw.title),
                content: sanitize_text(&raw.body),
                url: url.to_string(),
                country: Some(self.key.country),
            },
            published_at,
        }
    }

    /// The adapter's relevance filter; `true` when it has none.
    pub fn accepts(&self, draft: &DraftPost) -> bool {
        self.predicate.is_none_or(|p| p(draft))
    }
}

/// Parse a CSS selector, keeping the message from scraper's error.
pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Text of the first match, or empty.
pub fn first_text(document: &Html, css: &str) -> String {
    match selector(css) {
        Ok(sel) => document.select(&sel).next().map(element_text).unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Skipping unparsable detail selector");
            String::new()
        }
    }
}

/// Concatenated text of every match, or empty.
pub fn all_text(document: &Html, css: &str) -> String {
    match selector(css) {
        Ok(sel) => document.select(&sel).map(element_text).collect(),
        Err(e) => {
            warn!(error = %e, "Skipping unparsable detail selector");
            String::new()
        }
    }
}
