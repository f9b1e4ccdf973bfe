//! Liberian publishers.

use super::page_param;
use crate::models::{Country, DraftPost};
use crate::scrapers::adapter::{
    Adapter, DetailParser, DetailSelectors, Listing, RawDetail, all_text, first_text,
};
use crate::scrapers::dates::PublishTime;
use crate::utils::plus_encode;
use scraper::Html;

const COUNTRY: Country = Country::Liberia;

pub fn adapters() -> Vec<Adapter> {
    vec![liberian_observer(), executive_mansion()]
}

fn liberian_observer() -> Adapter {
    fn search(term: &str, page: Option<u32>) -> String {
        format!(
            "/search?sort_by=published_at&search_api_fulltext={}{}",
            plus_encode(term),
            page_param(page)
        )
    }
    fn mentions_weah(draft: &DraftPost) -> bool {
        draft.title_mentions(&["president", "weah", "george"])
    }
    Adapter::new(
        COUNTRY,
        "Liberian Observer",
        "https://www.liberianobserver.com",
        search,
        Listing {
            items: ".views-row.listing--articles__item",
            link: "article a",
        },
        DetailParser::Custom(observer_detail),
        PublishTime::new(&["%m/%d/%Y - %H:%M"]),
    )
    .with_predicate(mentions_weah)
    .with_url_prefix("https://www.liberianobserver.com")
}

const OBSERVER_SCOPE: &str = "#main #block-liberianobserver-content .content";

/// The publish line reads `Published at: 10/05/2023 - 14:20`.
fn observer_detail(document: &Html) -> RawDetail {
    let meta = first_text(
        document,
        &format!("{OBSERVER_SCOPE} .container > .article-meta span.article-meta__published-at"),
    );
    let date = meta
        .split_once("Published at:")
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default();

    RawDetail {
        title: first_text(document, &format!("{OBSERVER_SCOPE} h1.article--header__title")),
        date,
        body: all_text(document, &format!("{OBSERVER_SCOPE} .text-formatted.field p")),
    }
}

fn executive_mansion() -> Adapter {
    fn search(term: &str, page: Option<u32>) -> String {
        format!("/search/node?keys={}{}", plus_encode(term), page_param(page))
    }
    Adapter::new(
        COUNTRY,
        "Executive Mansion",
        "https://emansion.gov.lr",
        search,
        Listing {
            items: ".region-content ol li",
            link: "h3 a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: ".region-content .field--name-node-title h2",
            date: ".region-content .field--name-field-content-post-date time",
            body: ".region-content .field--name-field-add-paragraph p",
        }),
        PublishTime::new(&["%A, %B %d, %Y"]),
    )
}
