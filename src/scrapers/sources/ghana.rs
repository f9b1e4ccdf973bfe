//! Ghanaian publishers.

use super::wordpress_search;
use crate::models::Country;
use crate::scrapers::adapter::{Adapter, DetailParser, DetailSelectors, Listing};
use crate::scrapers::dates::PublishTime;

const COUNTRY: Country = Country::Ghana;

pub fn adapters() -> Vec<Adapter> {
    vec![citi_newsroom(), ghana_online()]
}

fn citi_newsroom() -> Adapter {
    Adapter::new(
        COUNTRY,
        "Citi Newsroom",
        "https://citinewsroom.com",
        wordpress_search,
        Listing {
            items: "article.jeg_post.jeg_pl_md_2",
            link: "h3.jeg_post_title a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div.jeg_main_content div.entry-header h1.jeg_post_title",
            date: "div.jeg_main_content div.entry-header div.jeg_meta_container div.jeg_meta_date",
            body: "div.jeg_main_content div.entry-content.no-share div.content-inner p",
        }),
        // Fresh posts carry no date at all.
        PublishTime {
            formats: &["%B %d, %Y"],
            empty_means_today: true,
        },
    )
}

fn ghana_online() -> Adapter {
    Adapter::new(
        COUNTRY,
        "Ghana Online",
        "https://www.gbcghanaonline.com",
        wordpress_search,
        Listing {
            items: "article.elementor-post",
            link: "h4.elementor-post__title a",
        },
        DetailParser::Selectors(DetailSelectors {
            title: "div.e-con-inner div.elementor-element-899710f h1.elementor-heading-title.elementor-size-default",
            date: "div.e-con-inner div.elementor-element-899710f span.elementor-post-info__item--type-date",
            body: "div.e-con-inner div.elementor-element-899710f [data-widget_type=\"theme-post-content.default\"] .elementor-widget-container > p",
        }),
        PublishTime::new(&["%B %d, %Y"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::start_of_day;
    use chrono::{TimeZone, Utc};

    #[test]
    fn citi_without_date_counts_as_today() {
        let html = r#"
            <div class="jeg_main_content">
              <div class="entry-header"><h1 class="jeg_post_title">Akufo-Addo commissions hospital</h1>
                <div class="jeg_meta_container"><div class="jeg_meta_date"></div></div>
              </div>
              <div class="entry-content no-share"><div class="content-inner"><p>Opened today.</p></div></div>
            </div>
        "#;
        let now = Utc.with_ymd_and_hms(2023, 10, 5, 12, 0, 0).unwrap();
        let parsed = citi_newsroom().parse_detail(html, "https://citinewsroom.com/x", now);
        assert_eq!(parsed.draft.content, "Opened today.");
        assert_eq!(
            parsed.published_at,
            Some(start_of_day(now.date_naive(), COUNTRY.timezone()))
        );
    }

    #[test]
    fn ghana_online_query() {
        assert_eq!(
            (ghana_online().search)("President Nana Akufo-Addo", Some(2)),
            "/page/2/?s=President+Nana+Akufo-Addo"
        );
    }
}
