//! Gambian publishers.

use super::wordpress_search;
use crate::fetch::RenderSpec;
use crate::models::{Country, DraftPost};
use crate::scrapers::adapter::{Adapter, DetailParser, DetailSelectors, Listing};
use crate::scrapers::dates::PublishTime;
use crate::utils::plus_encode;

const COUNTRY: Country = Country::Gambia;

pub fn adapters() -> Vec<Adapter> {
    vec![standard(), the_point()]
}

fn standard() -> Adapter {
    Adapter::new(
        COUNTRY,
        "The Standard",
        "https://standard.gm",
        wordpress_search,
        Listing {
            items: ".tdb_module_loop .td-module-container .td-image-container",
            link: ".td-module-thumb a.td-image-wrap",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div.tdb_title h1.tdb-title-text",
            date: "article.post.status-publish .tdb-post-meta time.entry-date",
            body: "div.td-post-content p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
}

/// Switches the Google custom-search widget from relevance to date order.
const SORT_BY_DATE: &str = "\
document.querySelector('td.gsc-orderby-container div.gsc-selected-option-container.gsc-inline-block').click();\
var opts=document.querySelectorAll('td.gsc-orderby-container div.gsc-option-menu-item div.gsc-option');\
if(opts[1]){opts[1].click();}";

fn the_point() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!("/search?q={}", plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "The Point",
        "https://thepoint.gm",
        search,
        Listing {
            items: ".gsc-webResult.gsc-result",
            link: "div.gsc-thumbnail-inside div.gs-title > a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "[role=\"main\"] div.hero-banner > .container h1.hero-title",
            date: "[role=\"main\"] div.hero-banner > .container p",
            body: "[role=\"main\"] > .container p",
        }),
        PublishTime::new(&["%b %d, %Y, %I:%M %p", "%b %d, %Y"]),
    )
    .rendered(RenderSpec {
        wait_for: ".gsc-resultsbox-visible",
        script: Some(SORT_BY_DATE),
        settle_ms: 3000,
    })
    .with_predicate(DraftPost::has_title_and_content)
}
