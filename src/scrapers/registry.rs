//! Adapter lookup by `(country, publisher)` and lazy source creation.

use super::adapter::Adapter;
use super::sources;
use crate::error::StoreError;
use crate::models::{Country, NewSource, Source, SourceKey};
use crate::store::{Store, StoreResult};
use tracing::info;

/// The set of adapters a run works from.
#[derive(Debug, Clone)]
pub struct Registry {
    adapters: Vec<Adapter>,
}

impl Registry {
    pub fn new(adapters: Vec<Adapter>) -> Self {
        Registry { adapters }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adapter> {
        self.adapters.iter()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn get(&self, key: &SourceKey) -> Option<&Adapter> {
        self.adapters.iter().find(|a| a.key == *key)
    }

    /// Case-insensitive lookup by publisher name.
    pub fn find(&self, country: Country, publisher: &str) -> Option<&Adapter> {
        self.adapters
            .iter()
            .find(|a| a.key.country == country && a.key.publisher.eq_ignore_ascii_case(publisher))
    }

    pub fn for_country(&self, country: Country) -> impl Iterator<Item = &Adapter> {
        self.adapters.iter().filter(move |a| a.key.country == country)
    }
}

impl Default for Registry {
    /// Every bundled publisher.
    fn default() -> Self {
        Registry::new(sources::all())
    }
}

/// Fetch the persisted source for `adapter`, creating it on first use.
///
/// A concurrent creator winning the race surfaces as a conflict, which is
/// resolved by reading the winner's record.
pub async fn ensure_source<S: Store>(store: &S, adapter: &Adapter) -> StoreResult<Source> {
    let SourceKey { country, publisher } = adapter.key;
    if let Some(source) = store.find_source(publisher, country).await? {
        return Ok(source);
    }

    let new = NewSource {
        name: publisher.to_string(),
        search_url: adapter.base_url.to_string(),
        country,
        image: None,
    };
    match store.create_source(new).await {
        Ok(source) => {
            info!(source = %adapter.key, id = %source.id, "Created source");
            Ok(source)
        }
        Err(StoreError::Conflict { .. }) => store
            .find_source(publisher, country)
            .await?
            .ok_or_else(|| StoreError::not_found("source", adapter.key)),
        Err(e) => Err(e),
    }
}
