//! Publisher adapters, one module per country.
//!
//! | Country | Publishers |
//! |---------|------------|
//! | Nigeria | Arise News, The Punch, The Guardian Nigeria, Vanguard, Sahara Reporters, State House, Business Day |
//! | Gambia | The Standard, The Point (rendered) |
//! | Ghana | Citi Newsroom, Ghana Online |
//! | Kenya | Office of the president, The Star (rendered), Nairobileo, Kenyans |
//! | Liberia | Liberian Observer, Executive Mansion |
//! | Sierra Leone | Awoko Newspaper, Sierria Leone State House, The Sierra Leone Telegraph (rendered) |

pub mod gambia;
pub mod ghana;
pub mod kenya;
pub mod liberia;
pub mod nigeria;
pub mod sierra_leone;

use super::adapter::Adapter;
use crate::utils::plus_encode;

/// Every bundled adapter.
pub fn all() -> Vec<Adapter> {
    [
        nigeria::adapters(),
        gambia::adapters(),
        ghana::adapters(),
        kenya::adapters(),
        liberia::adapters(),
        sierra_leone::adapters(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// `/page/N`, or nothing for the first page.
pub(crate) fn page_path(page: Option<u32>) -> String {
    page.map(|p| format!("/page/{p}")).unwrap_or_default()
}

/// `&page=N`, or nothing.
pub(crate) fn page_param(page: Option<u32>) -> String {
    page.map(|p| format!("&page={p}")).unwrap_or_default()
}

/// Stock WordPress search: `/page/N/?s=term+words`.
pub(crate) fn wordpress_search(term: &str, page: Option<u32>) -> String {
    format!("{}/?s={}", page_path(page), plus_encode(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;
    use itertools::Itertools;

    #[test]
    fn every_country_has_adapters() {
        let adapters = all();
        assert_eq!(adapters.len(), 20);
        for country in Country::ALL {
            assert!(adapters.iter().any(|a| a.key.country == country), "{country}");
        }
    }

    #[test]
    fn keys_are_unique() {
        let adapters = all();
        assert!(adapters.iter().map(|a| a.key).all_unique());
    }

    #[test]
    fn every_selector_parses() {
        use crate::scrapers::adapter::{selector, DetailParser};
        for a in all() {
            selector(a.listing.items).unwrap();
            selector(a.listing.link).unwrap();
            if let DetailParser::Selectors(sel) = a.detail {
                selector(sel.title).unwrap();
                selector(sel.date).unwrap();
                selector(sel.body).unwrap();
            }
        }
    }

    #[test]
    fn wordpress_search_pages() {
        assert_eq!(wordpress_search("President Tinubu", None), "/?s=President+Tinubu");
        assert_eq!(wordpress_search("Tinubu", Some(3)), "/page/3/?s=Tinubu");
    }
}
