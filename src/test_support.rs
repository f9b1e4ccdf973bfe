//! Fakes and fixtures shared by the unit tests.

use crate::api::AskAsync;
use crate::error::{FetchError, ModelError};
use crate::fetch::{FetchOptions, PageFetcher, RenderSpec};
use crate::models::{Country, NewSource, Post, Source};
use crate::scrapers::adapter::{Adapter, DetailParser, DetailSelectors, Listing};
use crate::scrapers::dates::PublishTime;
use crate::store::Store;
use crate::utils::plus_encode;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Serves canned HTML by URL. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    rendered: HashMap<String, String>,
    failing: HashSet<String>,
}

impl StaticFetcher {
    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn rendered_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.rendered.insert(url.to_string(), html.into());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    fn lookup(&self, pages: &HashMap<String, String>, url: &str) -> Result<String, FetchError> {
        if self.failing.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, _opts: FetchOptions) -> Result<String, FetchError> {
        self.lookup(&self.pages, url)
    }

    async fn render(&self, url: &str, _spec: &RenderSpec) -> Result<String, FetchError> {
        self.lookup(&self.rendered, url)
    }
}

/// Answers by matching substrings of the prompt's title line.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Vec<(String, String)>,
    failing: Vec<String>,
}

impl ScriptedModel {
    pub fn reply(mut self, title: &str, reply: &str) -> Self {
        self.replies.push((title.to_string(), reply.to_string()));
        self
    }

    pub fn failing(mut self, title: &str) -> Self {
        self.failing.push(title.to_string());
        self
    }
}

impl AskAsync for ScriptedModel {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<String, ModelError> {
        let title = text
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Title: "))
            .unwrap_or_default();
        if self.failing.iter().any(|f| title.contains(f.as_str())) {
            return Err(ModelError::Api {
                status: 500,
                message: "scripted failure".into(),
            });
        }
        self.replies
            .iter()
            .find(|(key, _)| title.contains(key.as_str()))
            .map(|(_, reply)| reply.clone())
            .ok_or(ModelError::EmptyResponse)
    }
}

/// Create a Nigerian source called `name`.
pub async fn source_named<S: Store>(store: &S, name: &str) -> Source {
    store
        .create_source(NewSource {
            name: name.to_string(),
            search_url: format!("https://{}", name.to_lowercase().replace(' ', "")),
            country: Country::Nigeria,
            image: None,
        })
        .await
        .unwrap()
}

/// An unpersisted source.
pub fn sample_source() -> Source {
    let now = Utc::now();
    Source {
        id: Uuid::new_v4(),
        name: "Vanguard".into(),
        search_url: "https://www.vanguardngr.com".into(),
        country: Country::Nigeria,
        image: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

/// A pending post from `source` published 2023-10-05 09:00 UTC.
pub fn post_for(source: &Source, title: &str) -> Post {
    let published = Utc.with_ymd_and_hms(2023, 10, 5, 9, 0, 0).unwrap();
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: format!("Full story: {title}."),
        published_at: published,
        source: source.id,
        url: format!("{}/{}", source.search_url, title.to_lowercase().replace(' ', "-")),
        country: source.country,
        status: Default::default(),
        is_processed: false,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

fn fixture_query(term: &str, page: Option<u32>) -> String {
    let page = page.map(|p| format!("/page/{p}")).unwrap_or_default();
    format!("{page}/?s={}", plus_encode(term))
}

/// A Nigerian publisher at `https://fixture.ng` that reads the markup
/// produced by [`listing_html`] and [`detail_html`].
pub fn fixture_adapter() -> Adapter {
    Adapter::new(
        Country::Nigeria,
        "Fixture News",
        "https://fixture.ng",
        fixture_query,
        Listing {
            items: "div.results article",
            link: "h3 a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "article h1",
            date: "article span.date",
            body: "article div.body p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
}

pub fn listing_html(urls: &[String]) -> String {
    let items: String = urls
        .iter()
        .map(|url| format!(r#"<article><h3><a href="{url}">Story</a></h3></article>"#))
        .collect();
    format!(r#"<html><body><div class="results">{items}</div></body></html>"#)
}

pub fn detail_html(title: &str, date: &str, body: &str) -> String {
    format!(
        r#"<html><body><article><h1>{title}</h1><span class="date">{date}</span><div class="body"><p>{body}</p></div></article></body></html>"#
    )
}
