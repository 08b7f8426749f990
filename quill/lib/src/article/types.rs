//! Stored article records and the view models projected from them.
//!
//! Records are deserialized leniently: a document-store export may omit
//! fields, leave references unpopulated, or use extended JSON for ids and
//! dates. Defaults are applied exactly once, when a record is projected into
//! a view model.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::markdown::TocEntry;

// =============================================================================
// Stored shapes
// =============================================================================

/// A document id, either a plain string or extended JSON `{"$oid": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Plain(String),
    Extended {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        match self {
            RecordId::Plain(id) => id,
            RecordId::Extended { oid } => oid,
        }
    }
}

/// A timestamp, either ISO-8601 or extended JSON `{"$date": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordDate {
    Iso(DateTime<Utc>),
    Extended {
        #[serde(rename = "$date")]
        date: DateTime<Utc>,
    },
}

impl RecordDate {
    pub fn as_utc(&self) -> DateTime<Utc> {
        match self {
            RecordDate::Iso(date) | RecordDate::Extended { date } => *date,
        }
    }
}

/// A populated category or tag reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxonomyRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A reference that may or may not have been populated.
///
/// Bare ids and any other shape are kept as [`Reference::Unresolved`] and
/// dropped from view models.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Populated(TaxonomyRecord),
    Unresolved(IgnoredAny),
}

impl Reference {
    fn populated(&self) -> Option<&TaxonomyRecord> {
        match self {
            Reference::Populated(record) => Some(record),
            Reference::Unresolved(_) => None,
        }
    }
}

/// Tags as stored: normally a list, but anything else counts as no tags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<Reference>),
    Other(IgnoredAny),
}

impl Default for TagList {
    fn default() -> Self {
        TagList::List(Vec::new())
    }
}

/// An article as stored by the content repository.
///
/// Only `_id` is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Markdown source.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category: Option<Reference>,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub is_top: Option<bool>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub published_at: Option<RecordDate>,
    #[serde(default)]
    pub created_at: Option<RecordDate>,
    #[serde(default)]
    pub updated_at: Option<RecordDate>,
}

impl ArticleRecord {
    /// Published unless explicitly marked `false`.
    pub fn is_published(&self) -> bool {
        self.is_published != Some(false)
    }

    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Markdown source, empty when absent.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at.map(|d| d.as_utc())
    }

    /// Projects the record into its list view, defaulting missing
    /// timestamps to `now`.
    pub fn to_list_item(&self, now: DateTime<Utc>) -> ArticleListItem {
        let tags = match &self.tags {
            TagList::List(refs) => refs
                .iter()
                .filter_map(Reference::populated)
                .map(TagView::from)
                .collect(),
            TagList::Other(_) => Vec::new(),
        };

        ArticleListItem {
            id: self.id.as_str().to_string(),
            title: self.title().to_string(),
            slug: self.slug().to_string(),
            summary: self.summary.clone().unwrap_or_default(),
            cover_image: self.cover_image.clone().unwrap_or_default(),
            category: self
                .category
                .as_ref()
                .and_then(Reference::populated)
                .map(CategoryView::from),
            tags,
            views: self.views.unwrap_or(0),
            is_top: self.is_top.unwrap_or(false),
            is_published: self.is_published(),
            published_at: iso_or_now(self.published_at, now),
            created_at: iso_or_now(self.created_at, now),
            updated_at: iso_or_now(self.updated_at, now),
        }
    }

    pub fn to_neighbor(&self) -> ArticleNeighbor {
        ArticleNeighbor {
            slug: self.slug().to_string(),
            title: self.title().to_string(),
        }
    }
}

fn iso_or_now(date: Option<RecordDate>, now: DateTime<Utc>) -> String {
    date.map(|d| d.as_utc())
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// View models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<&TaxonomyRecord> for CategoryView {
    fn from(record: &TaxonomyRecord) -> Self {
        Self {
            id: record.id.as_str().to_string(),
            name: record.name.clone().unwrap_or_default(),
            slug: record.slug.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<&TaxonomyRecord> for TagView {
    fn from(record: &TaxonomyRecord) -> Self {
        Self {
            id: record.id.as_str().to_string(),
            name: record.name.clone().unwrap_or_default(),
            slug: record.slug.clone().unwrap_or_default(),
        }
    }
}

/// Fully defaulted article summary as returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub cover_image: String,
    pub category: Option<CategoryView>,
    pub tags: Vec<TagView>,
    pub views: u64,
    pub is_top: bool,
    pub is_published: bool,
    /// ISO-8601, UTC.
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Article detail: the list fields plus rendered content and its outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub item: ArticleListItem,
    /// Rendered HTML.
    pub content: String,
    pub toc: Vec<TocEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleNeighbor {
    pub slug: String,
    pub title: String,
}

/// Response body of the article detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub article: ArticleDetail,
    pub prev_article: Option<ArticleNeighbor>,
    pub next_article: Option<ArticleNeighbor>,
}
