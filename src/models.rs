//! Data models for sources, posts, categories and activities.
//!
//! This module defines the records the pipelines produce and persist:
//! - [`Source`]: a publisher, created lazily on its first scrape
//! - [`DraftPost`]: an unpersisted candidate extracted from one detail page
//! - [`Post`]: an accepted, persisted article
//! - [`Category`]: a topical tag proposed by the model
//! - [`Activity`]: a categorized summary derived from one [`Post`]
//!
//! Every persisted record carries an `is_deleted` flag; nothing is hard-deleted.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The countries whose publishers are covered.
///
/// Serialized as the two-letter code stored on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "NG")]
    Nigeria,
    #[serde(rename = "GH")]
    Ghana,
    #[serde(rename = "GM")]
    Gambia,
    #[serde(rename = "KE")]
    Kenya,
    #[serde(rename = "LR")]
    Liberia,
    #[serde(rename = "SL")]
    SierraLeone,
}

impl Country {
    pub const ALL: [Country; 6] = [
        Country::Nigeria,
        Country::Ghana,
        Country::Gambia,
        Country::Kenya,
        Country::Liberia,
        Country::SierraLeone,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Country::Nigeria => "NG",
            Country::Ghana => "GH",
            Country::Gambia => "GM",
            Country::Kenya => "KE",
            Country::Liberia => "LR",
            Country::SierraLeone => "SL",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Country::Nigeria => "Nigeria",
            Country::Ghana => "Ghana",
            Country::Gambia => "Gambia",
            Country::Kenya => "Kenya",
            Country::Liberia => "Liberia",
            Country::SierraLeone => "Sierra Leone",
        }
    }

    /// Home timezone used to interpret publisher-local timestamps.
    pub fn timezone(self) -> Tz {
        match self {
            Country::Nigeria => chrono_tz::Africa::Lagos,
            Country::Ghana => chrono_tz::Africa::Accra,
            Country::Gambia => chrono_tz::Africa::Banjul,
            Country::Kenya => chrono_tz::Africa::Nairobi,
            Country::Liberia => chrono_tz::Africa::Monrovia,
            Country::SierraLeone => chrono_tz::Africa::Freetown,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown country `{s}`"))
    }
}

/// Registry key of a publisher: `(country, publisher name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey {
    pub country: Country,
    pub publisher: &'static str,
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country.code(), self.publisher)
    }
}

/// A publisher as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: Uuid,
    pub name: String,
    /// Base URL the adapter's search query is appended to.
    pub search_url: String,
    pub country: Country,
    pub image: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a [`Source`].
#[derive(Debug, Clone)]
pub struct NewSource {
    pub name: String,
    pub search_url: String,
    pub country: Country,
    pub image: Option<String>,
}

/// Moderation state of a [`Post`]. Only approved posts are summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Pending,
    Approved,
}

/// A candidate article extracted from one detail page.
///
/// Fields may be empty when selectors did not match; the normalizer rejects
/// such drafts instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPost {
    pub title: String,
    pub content: String,
    pub url: String,
    pub country: Option<Country>,
}

impl DraftPost {
    /// Case-insensitive check that the title mentions any of `needles`.
    pub fn title_mentions(&self, needles: &[&str]) -> bool {
        let title = self.title.to_lowercase();
        needles.iter().any(|n| title.contains(&n.to_lowercase()))
    }

    pub fn has_title_and_content(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// An accepted, persisted article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub source: Uuid,
    pub url: String,
    pub country: Country,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Promote an accepted draft into a new pending post.
    pub fn from_draft(
        draft: DraftPost,
        source: &Source,
        published_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Post {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            published_at,
            source: source.id,
            url: draft.url,
            country: draft.country.unwrap_or(source.country),
            status: PostStatus::Pending,
            is_processed: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A topical tag attached to activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub emoji: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// A categorized summary of one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub post: Uuid,
    pub categories: Vec<Uuid>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_published: bool,
    pub country: Country,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}
