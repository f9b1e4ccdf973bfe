//! Nigerian publishers.

use super::{page_param, page_path, wordpress_search};
use crate::models::{Country, DraftPost};
use crate::scrapers::adapter::{
    Adapter, DetailParser, DetailSelectors, Listing, RawDetail, first_text,
};
use crate::scrapers::dates::PublishTime;
use crate::utils::plus_encode;
use scraper::Html;

const COUNTRY: Country = Country::Nigeria;

pub fn adapters() -> Vec<Adapter> {
    vec![
        arise(),
        punch(),
        guardian(),
        vanguard(),
        sahara_reporters(),
        state_house(),
        business_day(),
    ]
}

fn mentions_tinubu(draft: &DraftPost) -> bool {
    draft.title_mentions(&["president", "tinubu"])
}

fn arise() -> Adapter {
    Adapter::new(
        COUNTRY,
        "Arise News",
        "https://www.arise.tv",
        wordpress_search,
        Listing {
            items: "div#arise_loop_content > article.snippet",
            link: ".article-content h3 a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "article#single_article h1.article-title",
            date: "article#single_article header.single-article-header span.date",
            body: "article#single_article div.article-content p",
        }),
        PublishTime::new(&["%H:%M, %d %b, %Y", "%I:%M, %d %b, %Y"]),
    )
}

fn punch() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!("/?s={}", plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "The Punch",
        "https://www.punchng.com",
        search,
        Listing {
            items: ".latest-news-timeline-section .post-title",
            link: "a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "article.single-article h1.post-title",
            date: "article.single-article span.post-date",
            body: "article.single-article div.post-content",
        }),
        PublishTime::new(&["%d %B %Y"]),
    )
}

fn guardian() -> Adapter {
    fn search(term: &str, page: Option<u32>) -> String {
        format!("/?s={}{}", plus_encode(term), page_param(page))
    }
    Adapter::new(
        COUNTRY,
        "The Guardian Nigeria",
        "https://www.guardian.ng",
        search,
        Listing {
            items: ".design-article .image",
            link: "a",
        },
        DetailParser::Custom(guardian_detail),
        PublishTime::new(&["%d %B %Y %I:%M%p", "%d %B, %Y %I:%M%p", "%d %B %Y"]),
    )
    .with_predicate(mentions_tinubu)
}

/// The Guardian prints `5 October 2023 | 3:45 pm`, sometimes with stray
/// quotes and non-breaking spaces around the separator.
fn guardian_detail(document: &Html) -> RawDetail {
    let raw_date = first_text(document, "main.page-main div.article-header .subhead .date")
        .replace("&nbsp;", " ")
        .replace(['\u{a0}', '\''], " ");
    let mut parts = raw_date.splitn(2, '|');
    let day = parts.next().unwrap_or_default().trim().to_string();
    let time: String = parts
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    RawDetail {
        title: first_text(document, "main.page-main h1.title"),
        date: format!("{day} {time}"),
        body: first_text(
            document,
            "main.page-main .mix-layout .single-article .content article",
        ),
    }
}

fn vanguard() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!("/?s={}&custom_search=1", plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "Vanguard",
        "https://www.vanguardngr.com",
        search,
        Listing {
            items: ".section-archive-bottom .entry-title",
            link: "a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "h2.entry-heading",
            date: ".content-area p.entry-excerpt-date",
            body: "div.entry-content-inner-wrapper",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
}

fn sahara_reporters() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!("/search?search_api_fulltext={}", plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "Sahara Reporters",
        "https://www.saharareporters.com",
        search,
        Listing {
            items: ".views-element-container .card-content .title",
            link: "a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "#block-octavia-sahara-page-title h1.title",
            date: ".column.is-3.group-left div",
            body: ".column.group-middle .content.story",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
}

fn state_house() -> Adapter {
    fn search(term: &str, page: Option<u32>) -> String {
        format!("{}?s={}", page_path(page), plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "State House",
        "https://statehouse.gov.ng",
        search,
        Listing {
            items: "div.row.masonry__container div.masonry__item",
            link: "div.masonry__item a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div.main-container .container .row article .article__title h1.h2",
            date: "div.main-container .container .row article .article__title span",
            body: "div.main-container .container .row article .article__body.post-content p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
}

fn business_day() -> Adapter {
    Adapter::new(
        COUNTRY,
        "Business Day",
        "https://businessday.ng",
        wordpress_search,
        Listing {
            items: "div.news div.post-info",
            link: "h2.post-title a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "main h1.post-title",
            date: "main .post-meta p.post-date",
            body: "main article .post-content p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
    .with_predicate(mentions_tinubu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn guardian_joins_split_date_and_time() {
        let html = r#"
            <main class="page-main">
              <div class="article-header">
                <h1 class="title">President Tinubu signs budget</h1>
                <div class="subhead"><span class="date">'5 October 2023&nbsp;| 3:45 pm</span></div>
              </div>
              <div class="mix-layout"><div class="single-article"><div class="content">
                <article>The President signed the budget.</article>
              </div></div></div>
            </main>
        "#;
        let parsed = guardian().parse_detail(html, "https://guardian.ng/a", Utc::now());
        assert_eq!(parsed.draft.title, "President Tinubu signs budget");
        assert_eq!(parsed.draft.content, "The President signed the budget.");
        assert_eq!(
            parsed.published_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 5, 14, 45, 0).unwrap())
        );
    }

    #[test]
    fn arise_parses_ordinal_date() {
        let html = r#"
            <article id="single_article">
              <header class="single-article-header">
                <h1 class="article-title">Tinubu departs Abuja</h1>
                <span class="date">10:32, 5th Oct, 2023</span>
              </header>
              <div class="article-content"><p>He left.</p><p> Back soon.</p></div>
            </article>
        "#;
        let parsed = arise().parse_detail(html, "https://www.arise.tv/x", Utc::now());
        assert_eq!(parsed.draft.content, "He left. Back soon.");
        assert_eq!(
            parsed.published_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 5, 9, 32, 0).unwrap())
        );
    }

    #[test]
    fn guardian_and_business_day_filter_on_title() {
        let off_topic = DraftPost {
            title: "Naira slides again".into(),
            content: "Markets".into(),
            ..Default::default()
        };
        assert!(!guardian().accepts(&off_topic));
        assert!(!business_day().accepts(&off_topic));
        assert!(punch().accepts(&off_topic));
    }

    #[test]
    fn state_house_query_has_no_slash_before_query() {
        assert_eq!(
            (state_house().search)("President Tinubu", Some(2)),
            "/page/2?s=President+Tinubu"
        );
    }
}
