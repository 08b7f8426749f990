use chrono::{DateTime, Utc};

use crate::article::{
    ArticleDetail, ArticleError, ArticleKey, ArticleListItem, ArticlePage, ArticleRepository,
    ArticleResult,
};
use crate::markdown::MarkdownPipeline;

/// Builds article detail pages from a repository and a Markdown pipeline.
#[derive(Debug)]
pub struct ArticleService<'p, R> {
    repository: R,
    pipeline: &'p MarkdownPipeline,
}

impl<R: ArticleRepository> ArticleService<'static, R> {
    /// A service rendering with [`MarkdownPipeline::global`].
    pub fn new(repository: R) -> Self {
        Self::with_pipeline(repository, MarkdownPipeline::global())
    }
}

impl<'p, R: ArticleRepository> ArticleService<'p, R> {
    pub fn with_pipeline(repository: R, pipeline: &'p MarkdownPipeline) -> Self {
        Self {
            repository,
            pipeline,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Lists published articles as view models, newest first.
    ///
    /// ## Errors
    ///
    /// Returns any error raised by the repository.
    pub async fn list(&self) -> ArticleResult<Vec<ArticleListItem>> {
        self.list_at(Utc::now()).await
    }

    /// Same as [`Self::list`], with missing timestamps defaulting to `now`.
    pub async fn list_at(&self, now: DateTime<Utc>) -> ArticleResult<Vec<ArticleListItem>> {
        let records = self.repository.list_published().await?;
        tracing::debug!(count = records.len(), "Listed published articles");
        Ok(records.iter().map(|r| r.to_list_item(now)).collect())
    }

    /// Resolves a route parameter to the article detail page.
    ///
    /// ## Errors
    ///
    /// - [`ArticleError::MissingKey`] for an empty parameter
    /// - [`ArticleError::NotFound`] if no published article matches
    /// - [`ArticleError::Markdown`] if the highlighter cannot be built
    /// - any error raised by the repository
    pub async fn page(&self, raw_key: &str) -> ArticleResult<ArticlePage> {
        self.page_at(raw_key, Utc::now()).await
    }

    /// Same as [`Self::page`], with missing timestamps defaulting to `now`.
    pub async fn page_at(&self, raw_key: &str, now: DateTime<Utc>) -> ArticleResult<ArticlePage> {
        let key = ArticleKey::parse(raw_key)?;

        let record = self
            .repository
            .find_published(&key)
            .await?
            .ok_or_else(|| ArticleError::NotFound(key.as_str().to_string()))?;

        let rendered = self.pipeline.render_document(record.content())?;
        let neighbors = self.repository.neighbors(&record).await?;

        tracing::debug!(
            key = key.as_str(),
            toc_entries = rendered.toc.len(),
            has_prev = neighbors.prev.is_some(),
            has_next = neighbors.next.is_some(),
            "Rendered article page"
        );

        Ok(ArticlePage {
            article: ArticleDetail {
                item: record.to_list_item(now),
                content: rendered.html,
                toc: rendered.toc,
            },
            prev_article: neighbors.prev,
            next_article: neighbors.next,
        })
    }
}
