//! Kenyan publishers.

use super::{page_param, page_path};
use crate::fetch::RenderSpec;
use crate::models::{Country, DraftPost};
use crate::scrapers::adapter::{Adapter, DetailParser, DetailSelectors, Listing};
use crate::scrapers::dates::PublishTime;
use crate::utils::plus_encode;

const COUNTRY: Country = Country::Kenya;

pub fn adapters() -> Vec<Adapter> {
    vec![office_of_the_president(), the_star(), nairobileo(), kenyans()]
}

fn office_of_the_president() -> Adapter {
    fn search(term: &str, page: Option<u32>) -> String {
        format!("{}?s={}", page_path(page), plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "Office of the president",
        "https://president.go.ke",
        search,
        Listing {
            items: "li.bricks-layout-item.repeater-item",
            link: "div.content-wrapper h3.dynamic a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "main#brx-content section.brxe-section h1.brxe-post-title",
            date: "main#brx-content section.brxe-section div.brxe-post-meta.post-meta span.item",
            body: "main#brx-content section.brxe-section div.brxe-post-content p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
    // The site serves an incomplete certificate chain.
    .insecure_tls()
    .with_predicate(DraftPost::has_title_and_content)
}

fn the_star() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!("/search/?query={}", plus_encode(term))
    }
    Adapter::new(
        COUNTRY,
        "The Star",
        "https://www.the-star.co.ke",
        search,
        Listing {
            items: "#search #articles .results .articles-result-item",
            link: "div.article-body a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div#article .article-header h1.article-title",
            date: "div#article div.article-body .article-meta > div.article-published",
            body: "div#article .article-body .article-widget-text .text p",
        }),
        PublishTime::new(&["%d %B %Y - %H:%M"]),
    )
    .rendered(RenderSpec {
        wait_for: "div#search #articles .results .articles-result-item",
        script: None,
        settle_ms: 0,
    })
}

fn nairobileo() -> Adapter {
    fn search(term: &str, _page: Option<u32>) -> String {
        format!("/search?query={}", plus_encode(term))
    }
    fn mentions_ruto(draft: &DraftPost) -> bool {
        draft.title_mentions(&["president", "william", "ruto"])
    }
    Adapter::new(
        COUNTRY,
        "Nairobileo",
        "https://nairobileo.co.ke",
        search,
        Listing {
            items: ".container #more-stories .row.post",
            link: "h4.fw-bold a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "main.container h1.fw-bold",
            date: "main.container small span.text-muted",
            body: "main.container div.post-content p",
        }),
        PublishTime::new(&["%b %d, %Y at %I:%M %p"]),
    )
    .with_predicate(mentions_ruto)
}

fn kenyans() -> Adapter {
    fn search(term: &str, page: Option<u32>) -> String {
        format!(
            "/search?search={}&sort_by=date&sort_order=DESC{}",
            plus_encode(term),
            page_param(page)
        )
    }
    Adapter::new(
        COUNTRY,
        "Kenyans",
        "https://www.kenyans.co.ke",
        search,
        Listing {
            items: "div.views-element-container .view-content .search-wrapper ul li",
            link: "h2.search-title a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div.layout-content h1.page-title",
            date: "div.layout-content span.article-date",
            body: "div.layout-content .layout .text-formatted.field p",
        }),
        PublishTime::new(&["%A, %d %B %Y - %I:%M %p"]),
    )
    .with_url_prefix("https://www.kenyans.co.ke")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn office_of_the_president_skips_certificate_checks() {
        assert!(office_of_the_president().fetch_options().insecure_tls);
        assert!(!kenyans().fetch_options().insecure_tls);
    }

    #[test]
    fn kenyans_listing_links_get_the_site_prefix() {
        let html = r#"
            <div class="views-element-container"><div class="view-content"><div class="search-wrapper"><ul>
              <li><h2 class="search-title"><a href="/news/95012-ruto-meets-envoys">Ruto meets envoys</a></h2></li>
              <li><h2 class="search-title"><a href="/news/95013-ruto-tours-kisumu">Ruto tours Kisumu</a></h2></li>
            </ul></div></div></div>
        "#;
        let urls = kenyans().extract_detail_urls(html).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.kenyans.co.ke/news/95012-ruto-meets-envoys".to_string(),
                "https://www.kenyans.co.ke/news/95013-ruto-tours-kisumu".to_string(),
            ]
        );
    }

    #[test]
    fn nairobileo_date_with_at_separator() {
        let html = r#"
            <main class="container">
              <h1 class="fw-bold">President Ruto in Mombasa</h1>
              <small><span class="text-muted">Oct 05, 2023 at 09:15 AM</span></small>
              <div class="post-content"><p>Ruto arrived.</p></div>
            </main>
        "#;
        let parsed = nairobileo().parse_detail(html, "https://nairobileo.co.ke/x", Utc::now());
        assert_eq!(
            parsed.published_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 5, 6, 15, 0).unwrap())
        );
        assert!(nairobileo().accepts(&parsed.draft));
    }
}
