//! The content repository seam.
//!
//! Storage lives outside this crate. [`ArticleRepository`] describes the two
//! queries the detail page needs; [`MemoryRepository`] answers them from
//! records loaded out of a JSON export.

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::future::Future;
use std::path::Path;

use crate::article::{ArticleError, ArticleNeighbor, ArticleRecord, ArticleResult};

/// How a route parameter identifies an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleKey {
    /// A 24 hex digit document id.
    Id(String),
    Slug(String),
}

impl ArticleKey {
    /// Classifies a route parameter.
    ///
    /// ## Examples
    ///
    /// ```
    /// use quill_lib::article::ArticleKey;
    ///
    /// let key = ArticleKey::parse("65f1c0ffee0000000000ABCD").unwrap();
    /// assert!(matches!(key, ArticleKey::Id(_)));
    /// let key = ArticleKey::parse("hello-rust").unwrap();
    /// assert!(matches!(key, ArticleKey::Slug(_)));
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns [`ArticleError::MissingKey`] for an empty parameter.
    pub fn parse(raw: &str) -> ArticleResult<Self> {
        if raw.is_empty() {
            return Err(ArticleError::MissingKey);
        }
        if raw.len() == 24 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(ArticleKey::Id(raw.to_string()))
        } else {
            Ok(ArticleKey::Slug(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArticleKey::Id(s) | ArticleKey::Slug(s) => s,
        }
    }

    fn matches(&self, record: &ArticleRecord) -> bool {
        match self {
            ArticleKey::Id(id) => record.id.as_str().eq_ignore_ascii_case(id),
            ArticleKey::Slug(slug) => record.slug.as_deref() == Some(slug.as_str()),
        }
    }
}

/// The articles published immediately before and after another one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub prev: Option<ArticleNeighbor>,
    pub next: Option<ArticleNeighbor>,
}

/// Read access to stored articles.
pub trait ArticleRepository: Send + Sync {
    /// Lists published articles, most recently published first. Articles
    /// without `publishedAt` come last.
    fn list_published(&self) -> impl Future<Output = ArticleResult<Vec<ArticleRecord>>> + Send;

    /// Finds the published article identified by `key`.
    fn find_published(
        &self,
        key: &ArticleKey,
    ) -> impl Future<Output = ArticleResult<Option<ArticleRecord>>> + Send;

    /// Finds the published articles adjacent to `record` by `publishedAt`:
    /// the latest one published earlier and the earliest one published later.
    fn neighbors(
        &self,
        record: &ArticleRecord,
    ) -> impl Future<Output = ArticleResult<Neighbors>> + Send;
}

/// An in-memory repository.
///
/// ## Examples
///
/// ```
/// use quill_lib::article::MemoryRepository;
///
/// let repo = MemoryRepository::from_json(r#"[{ "_id": "a", "slug": "hello" }]"#).unwrap();
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    records: Vec<ArticleRecord>,
}

impl MemoryRepository {
    pub fn new(records: Vec<ArticleRecord>) -> Self {
        Self { records }
    }

    /// Loads records from a JSON array.
    ///
    /// ## Errors
    ///
    /// Returns [`ArticleError::Json`] if the text is not an array of records.
    pub fn from_json(json: &str) -> ArticleResult<Self> {
        let records: Vec<ArticleRecord> = serde_json::from_str(json)?;
        tracing::debug!(count = records.len(), "Loaded article records");
        Ok(Self::new(records))
    }

    /// Loads records from a JSON export file.
    ///
    /// ## Errors
    ///
    /// Returns [`ArticleError::Io`] if the file cannot be read, or
    /// [`ArticleError::Json`] if it does not hold an array of records.
    pub fn from_path(path: &Path) -> ArticleResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ArticleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn published(&self) -> impl Iterator<Item = (&ArticleRecord, DateTime<Utc>)> {
        self.records
            .iter()
            .filter(|r| r.is_published())
            .filter_map(|r| r.published_at().map(|at| (r, at)))
    }
}

impl ArticleRepository for MemoryRepository {
    async fn list_published(&self) -> ArticleResult<Vec<ArticleRecord>> {
        let mut records: Vec<ArticleRecord> = self
            .records
            .iter()
            .filter(|r| r.is_published())
            .cloned()
            .collect();
        records.sort_by_key(|r| Reverse(r.published_at()));
        Ok(records)
    }

    async fn find_published(&self, key: &ArticleKey) -> ArticleResult<Option<ArticleRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.is_published() && key.matches(r))
            .cloned())
    }

    async fn neighbors(&self, record: &ArticleRecord) -> ArticleResult<Neighbors> {
        let Some(at) = record.published_at() else {
            return Ok(Neighbors::default());
        };

        let prev = self
            .published()
            .filter(|(_, other)| *other < at)
            .max_by_key(|(_, other)| *other)
            .map(|(r, _)| r.to_neighbor());
        let next = self
            .published()
            .filter(|(_, other)| *other > at)
            .min_by_key(|(_, other)| *other)
            .map(|(r, _)| r.to_neighbor());

        Ok(Neighbors { prev, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"[
        { "_id": "65f1c0ffee00000000000001", "slug": "first", "title": "First",
          "publishedAt": "2024-01-01T00:00:00Z" },
        { "_id": "65f1c0ffee00000000000002", "slug": "draft", "title": "Draft",
          "isPublished": false, "publishedAt": "2024-01-15T00:00:00Z" },
        { "_id": "65f1c0ffee00000000000003", "slug": "second", "title": "Second",
          "publishedAt": "2024-02-01T00:00:00Z" },
        { "_id": "65f1c0ffee00000000000004", "slug": "third", "title": "Third",
          "publishedAt": "2024-03-01T00:00:00Z" }
    ]"#;

    fn repo() -> MemoryRepository {
        MemoryRepository::from_json(EXPORT).unwrap()
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(
            ArticleKey::parse("65f1c0ffee00000000000001").unwrap(),
            ArticleKey::Id("65f1c0ffee00000000000001".to_string())
        );
        // 23 and 25 digits are slugs
        assert!(matches!(
            ArticleKey::parse("65f1c0ffee0000000000001").unwrap(),
            ArticleKey::Slug(_)
        ));
        assert!(matches!(
            ArticleKey::parse("65f1c0ffee000000000000011").unwrap(),
            ArticleKey::Slug(_)
        ));
        assert!(matches!(
            ArticleKey::parse("zzf1c0ffee00000000000001").unwrap(),
            ArticleKey::Slug(_)
        ));
        assert!(matches!(ArticleKey::parse(""), Err(ArticleError::MissingKey)));
    }

    #[tokio::test]
    async fn test_find_by_slug_and_id() {
        let repo = repo();
        let by_slug = repo
            .find_published(&ArticleKey::parse("second").unwrap())
            .await
            .unwrap();
        assert_eq!(by_slug.unwrap().title(), "Second");

        let by_id = repo
            .find_published(&ArticleKey::parse("65F1C0FFEE00000000000003").unwrap())
            .await
            .unwrap();
        assert_eq!(by_id.unwrap().slug(), "second");
    }

    #[tokio::test]
    async fn test_list_published_newest_first() {
        let mut repo = repo();
        repo.records.push(
            serde_json::from_str(r#"{ "_id": "65f1c0ffee00000000000005", "slug": "undated" }"#)
                .unwrap(),
        );
        let slugs: Vec<String> = repo
            .list_published()
            .await
            .unwrap()
            .iter()
            .map(|r| r.slug().to_string())
            .collect();
        assert_eq!(slugs, vec!["third", "second", "first", "undated"]);
    }

    #[tokio::test]
    async fn test_drafts_are_not_found() {
        let found = repo()
            .find_published(&ArticleKey::parse("draft").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_neighbors_skip_drafts() {
        let repo = repo();
        let second = repo
            .find_published(&ArticleKey::parse("second").unwrap())
            .await
            .unwrap()
            .unwrap();
        let neighbors = repo.neighbors(&second).await.unwrap();
        assert_eq!(neighbors.prev.unwrap().slug, "first");
        assert_eq!(neighbors.next.unwrap().slug, "third");
    }

    #[tokio::test]
    async fn test_neighbors_at_the_ends() {
        let repo = repo();
        let first = repo
            .find_published(&ArticleKey::parse("first").unwrap())
            .await
            .unwrap()
            .unwrap();
        let neighbors = repo.neighbors(&first).await.unwrap();
        assert!(neighbors.prev.is_none());
        assert_eq!(neighbors.next.unwrap().title, "Second");
    }

    #[test]
    fn test_invalid_export() {
        assert!(matches!(
            MemoryRepository::from_json(r#"{ "not": "an array" }"#),
            Err(ArticleError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = MemoryRepository::from_path(Path::new("/nonexistent/quill/export.json"))
            .unwrap_err();
        assert!(matches!(err, ArticleError::Io { .. }));
        assert_eq!(err.status_code(), 500);
    }
}
