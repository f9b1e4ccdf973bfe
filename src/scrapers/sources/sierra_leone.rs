//! Sierra Leonean publishers.

use super::wordpress_search;
use crate::fetch::RenderSpec;
use crate::models::Country;
use crate::scrapers::adapter::{
    Adapter, DetailParser, DetailSelectors, Listing, RawDetail, all_text, first_text,
};
use crate::scrapers::dates::PublishTime;
use crate::utils::percent_encode;
use scraper::Html;

const COUNTRY: Country = Country::SierraLeone;

pub fn adapters() -> Vec<Adapter> {
    vec![awoko(), state_house(), telegraph()]
}

fn awoko() -> Adapter {
    Adapter::new(
        COUNTRY,
        "Awoko Newspaper",
        "https://awokonewspaper.sl",
        wordpress_search,
        Listing {
            items: "div.jeg_posts article.jeg_post",
            link: "h3.jeg_post_title a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div.jeg_content.jeg_singlepage div.jeg_main_content h1.jeg_post_title",
            date: "div.jeg_content.jeg_singlepage .jeg_meta_date a",
            body: "div.jeg_content.jeg_singlepage .content-inner p",
        }),
        PublishTime::new(&["%d/%m/%Y"]),
    )
}

fn state_house() -> Adapter {
    Adapter::new(
        COUNTRY,
        "Sierria Leone State House",
        "https://statehouse.gov.sl",
        wordpress_search,
        Listing {
            items: "div.main article.post",
            link: "header h2.post-title a",
        },
        DetailParser::Custom(state_house_detail),
        PublishTime::new(&["%B %d, %Y - %I:%M %p", "%B %d, %Y"]),
    )
}

const STATE_HOUSE_SCOPE: &str = "[data-elementor-type=\"single-post\"]";

/// Date and time sit in separate elements.
fn state_house_detail(document: &Html) -> RawDetail {
    let date = first_text(
        document,
        &format!("{STATE_HOUSE_SCOPE} span.elementor-post-info__item--type-date"),
    );
    let time = first_text(
        document,
        &format!("{STATE_HOUSE_SCOPE} span.elementor-post-info__item--type-time"),
    );
    let date = match (date.trim(), time.trim()) {
        ("", _) => String::new(),
        (d, "") => d.to_string(),
        (d, t) => format!("{d} - {t}"),
    };

    RawDetail {
        title: first_text(document, &format!("{STATE_HOUSE_SCOPE} h1.elementor-heading-title")),
        date,
        body: all_text(
            document,
            &format!(
                "{STATE_HOUSE_SCOPE} div.elementor-widget-theme-post-content div.elementor-widget-container p"
            ),
        ),
    }
}

fn telegraph() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!(
            "/?s={}&year_post_date=2023-01-01%2000%3A00%3A00&post_types=post&sort=newest",
            percent_encode(term)
        )
    }
    const RESULT: &str =
        ".jetpack-instant-search__search-result.jetpack-instant-search__search-result-expanded";
    Adapter::new(
        COUNTRY,
        "The Sierra Leone Telegraph",
        "https://www.thesierraleonetelegraph.com",
        search,
        Listing {
            items: RESULT,
            link: "h3.jetpack-instant-search__search-result-title a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div#main-content article header.entry-header h1.entry-title",
            date: "div#main-content article header.entry-header span.entry-meta-date a",
            body: "div#main-content article div.entry-content p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
    .rendered(RenderSpec {
        wait_for: RESULT,
        script: None,
        settle_ms: 0,
    })
}
