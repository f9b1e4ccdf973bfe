//! Category vocabulary and batch-wide name resolution.

use crate::models::Category;
use crate::store::{Store, StoreResult};
use tracing::info;
use uuid::Uuid;

/// Seed vocabulary offered to the model, with the emoji each one gets.
pub const SEED_CATEGORIES: [(&str, &str); 15] = [
    ("policy", "📜"),
    ("economic", "💰"),
    ("social", "🤝"),
    ("infrastructure", "🏗️"),
    ("foreign", "🌍"),
    ("public", "🏛️"),
    ("environment", "🌳"),
    ("transparency", "🕵️‍♂️"),
    ("ethics", "🤔"),
    ("crisis", "🆘"),
    ("communication", "📢"),
    ("media", "📰"),
    ("judiciary", "⚖️"),
    ("education", "🎓"),
    ("healthcare", "🏥"),
];

/// Emoji for a seed category name (exact match).
pub fn emoji_for(name: &str) -> Option<&'static str> {
    SEED_CATEGORIES
        .iter()
        .find(|(seed, _)| *seed == name)
        .map(|(_, emoji)| *emoji)
}

/// Resolves model-proposed names to category ids.
///
/// Seeded with the persisted categories; every category created during the
/// batch is appended so later activities reuse it. Must be driven
/// sequentially.
#[derive(Debug, Default)]
pub struct CategoryResolver {
    known: Vec<Category>,
}

impl CategoryResolver {
    pub fn new(known: Vec<Category>) -> Self {
        CategoryResolver { known }
    }

    /// Ids for `names`, creating missing categories. Ids are unique and keep
    /// the order names first appear in.
    pub async fn resolve<S: Store>(&mut self, store: &S, names: &[String]) -> StoreResult<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = match self.known.iter().find(|c| c.name == *name) {
                Some(existing) => existing.id,
                None => {
                    let created = store.create_category(name, emoji_for(name)).await?;
                    info!(category = %created.name, id = %created.id, "Created category");
                    let id = created.id;
                    self.known.push(created);
                    id
                }
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    pub fn known(&self) -> &[Category] {
        &self.known
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, Page};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn seed_names_have_emoji() {
        assert_eq!(emoji_for("policy"), Some("📜"));
        assert_eq!(emoji_for("healthcare"), Some("🏥"));
        assert_eq!(emoji_for("Policy"), None);
        assert_eq!(emoji_for("space"), None);
    }

    #[tokio::test]
    async fn creates_once_and_reuses_within_batch() {
        let store = DocumentStore::in_memory();
        let mut resolver = CategoryResolver::default();

        let first = resolver.resolve(&store, &names(&["policy", "economic"])).await.unwrap();
        let second = resolver.resolve(&store, &names(&["policy", "space race"])).await.unwrap();
        assert_eq!(first[0], second[0]);

        let stored = store.list_categories(Page::all()).await.unwrap();
        assert_eq!(stored.len(), 3);
        let space = stored.iter().find(|c| c.name == "space race").unwrap();
        assert_eq!(space.emoji, None);
        let policy = stored.iter().find(|c| c.name == "policy").unwrap();
        assert_eq!(policy.emoji.as_deref(), Some("📜"));
    }

    #[tokio::test]
    async fn reuses_persisted_categories() {
        let store = DocumentStore::in_memory();
        let existing = store.create_category("media", Some("📰")).await.unwrap();
        let mut resolver = CategoryResolver::new(store.list_categories(Page::all()).await.unwrap());

        let ids = resolver.resolve(&store, &names(&["media"])).await.unwrap();
        assert_eq!(ids, vec![existing.id]);
        assert_eq!(resolver.known().len(), 1);
    }

    #[tokio::test]
    async fn ids_within_one_activity_are_unique() {
        let store = DocumentStore::in_memory();
        let mut resolver = CategoryResolver::default();
        let ids = resolver
            .resolve(&store, &names(&["policy", "policy", "crisis"]))
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn name_matching_is_case_sensitive() {
        let store = DocumentStore::in_memory();
        let mut resolver = CategoryResolver::default();
        let ids = resolver.resolve(&store, &names(&["policy", "Policy"])).await.unwrap();
        assert_eq!(ids.len(), 2);
    }
}
