use std::path::PathBuf;
use thiserror::Error;

use crate::markdown::MarkdownError;

/// Errors raised while serving article pages.
#[derive(Error, Debug)]
pub enum ArticleError {
    /// The route parameter was empty.
    #[error("Article slug or id is required")]
    MissingKey,

    /// No published article matches the key.
    #[error("Article not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Markdown(#[from] MarkdownError),

    /// An article export could not be parsed.
    #[error("Invalid article data: {0}")]
    Json(#[from] serde_json::Error),

    /// An article export could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A storage backend implementing [`crate::article::ArticleRepository`]
    /// failed, e.g. a lost database connection. [`MemoryRepository`] never
    /// returns it.
    ///
    /// [`MemoryRepository`]: crate::article::MemoryRepository
    #[error("Repository error: {0}")]
    Repository(String),
}

impl ArticleError {
    /// HTTP status a handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ArticleError::MissingKey => 400,
            ArticleError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

/// Result type for article operations.
pub type ArticleResult<T> = Result<T, ArticleError>;
