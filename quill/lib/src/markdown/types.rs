//! Type definitions for the markdown module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up the rendering pipeline.
///
/// Malformed Markdown and per-block highlighting failures are never errors;
/// only the one-time highlighter construction can fail.
#[derive(Error, Debug)]
pub enum MarkdownError {
    /// Failed to load a theme file from disk.
    #[error("Failed to load theme file {path}: {source}")]
    ThemeLoad {
        path: PathBuf,
        #[source]
        source: syntect::LoadingError,
    },

    /// Failed to build the highlighter for any other reason.
    #[error("Failed to initialize syntax highlighter: {0}")]
    HighlighterInit(String),
}

/// Result type for markdown operations.
pub type MarkdownResult<T> = Result<T, MarkdownError>;
