//! Markdown rendering with heading anchors, a table of contents and syntax
//! highlighted code blocks.
//!
//! Everything runs through one [`MarkdownPipeline`]: it owns the parser
//! options, the inline extensions and the anchor pass, so the HTML renderer
//! and the TOC extractor always agree on heading ids.
//!
//! ## Examples
//!
//! ```
//! use quill_lib::markdown::{extract_toc, render_markdown};
//!
//! let content = "# 你好 世界\n\nbody";
//! let html = render_markdown(content).unwrap();
//! let toc = extract_toc(content);
//!
//! assert_eq!(toc[0].id, "%E4%BD%A0%E5%A5%BD-%E4%B8%96%E7%95%8C");
//! assert!(html.contains(&format!(r#"<h1 id="{}">"#, toc[0].id)));
//! ```

mod anchors;
mod config;
pub mod highlighting;
pub mod inline;
pub mod output;
mod slug;
pub mod toc;
mod types;

pub use anchors::{ANCHOR_LEVELS, Heading};
pub use config::{CODE_THEME_ENV, PipelineConfig, THEME_FILE_ENV, UNIQUE_SLUGS_ENV};
pub use output::RenderedDocument;
pub use slug::{SlugPolicy, Slugger, slugify};
pub use toc::TocEntry;
pub use types::{MarkdownError, MarkdownResult};

use once_cell::sync::{Lazy, OnceCell};
use pulldown_cmark::{Event, Parser, TextMergeStream};

use crate::markdown::highlighting::CodeHighlighter;
use crate::markdown::inline::{Linkify, typography};

static GLOBAL_PIPELINE: Lazy<MarkdownPipeline> =
    Lazy::new(|| MarkdownPipeline::new(PipelineConfig::from_env()));

/// The event stream of one document after every pipeline pass.
///
/// Heading ids are already written into the heading tags; [`Self::headings`]
/// lists the same headings with their plain text.
#[derive(Debug, Clone)]
pub struct ParsedDocument<'a> {
    events: Vec<Event<'a>>,
    headings: Vec<Heading>,
}

impl<'a> ParsedDocument<'a> {
    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn into_events(self) -> Vec<Event<'a>> {
        self.events
    }
}

/// Parser configuration plus the lazily built highlighter.
///
/// Parsing and TOC extraction never touch the highlighter. The highlighter
/// is built at most once, on the first render; concurrent first renders
/// wait for that single construction. A failed construction is returned to
/// the caller and leaves the cell empty, so the next render retries.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::{MarkdownPipeline, PipelineConfig, SlugPolicy};
///
/// let pipeline = MarkdownPipeline::new(
///     PipelineConfig::default().with_slug_policy(SlugPolicy::Unique),
/// );
/// let doc = pipeline.render_document("# A\n\n# A").unwrap();
/// assert_eq!(doc.toc[1].id, "a-1");
/// assert!(doc.html.contains(r#"<h1 id="a-1">"#));
/// ```
#[derive(Debug)]
pub struct MarkdownPipeline {
    config: PipelineConfig,
    highlighter: OnceCell<CodeHighlighter>,
}

impl MarkdownPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            highlighter: OnceCell::new(),
        }
    }

    /// The process-wide pipeline, configured from `QUILL_*` environment
    /// variables on first use.
    pub fn global() -> &'static MarkdownPipeline {
        &GLOBAL_PIPELINE
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the highlighter, building it on first use.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configured theme cannot be loaded.
    pub fn highlighter(&self) -> MarkdownResult<&CodeHighlighter> {
        self.highlighter.get_or_try_init(|| {
            CodeHighlighter::load(&self.config.theme).inspect_err(|e| {
                tracing::error!(error = %e, "Failed to initialize syntax highlighter");
            })
        })
    }

    /// Returns `true` once the highlighter has been built.
    pub fn highlighter_ready(&self) -> bool {
        self.highlighter.get().is_some()
    }

    /// Parses `content` and runs the inline and anchor passes.
    pub fn parse<'a>(&self, content: &'a str) -> ParsedDocument<'a> {
        let parser = TextMergeStream::new(Parser::new_ext(content, self.config.parser_options()));
        let mut events: Vec<Event<'a>> = if self.config.linkify {
            Linkify::new(parser).collect()
        } else {
            parser.collect()
        };

        if self.config.typographer {
            typography::apply(&mut events);
        }

        let mut slugger = Slugger::new(self.config.slug_policy);
        let headings = anchors::assign_ids(&mut events, &mut slugger);

        ParsedDocument { events, headings }
    }

    /// Renders `content` to HTML.
    ///
    /// ## Errors
    ///
    /// Returns an error only if the highlighter cannot be built; malformed
    /// Markdown is rendered best-effort.
    pub fn render(&self, content: &str) -> MarkdownResult<String> {
        let highlighter = self.highlighter()?;
        Ok(output::render_html(self.parse(content).into_events(), highlighter))
    }

    /// Extracts the table of contents of `content`. Never fails.
    pub fn toc(&self, content: &str) -> Vec<TocEntry> {
        toc::from_document(&self.parse(content))
    }

    /// Renders the HTML and the table of contents from a single parse.
    ///
    /// ## Errors
    ///
    /// Same as [`Self::render`].
    pub fn render_document(&self, content: &str) -> MarkdownResult<RenderedDocument> {
        let highlighter = self.highlighter()?;
        let document = self.parse(content);
        let toc = toc::from_document(&document);
        let html = output::render_html(document.into_events(), highlighter);
        Ok(RenderedDocument { html, toc })
    }
}

/// Renders `content` with the global pipeline.
///
/// ## Errors
///
/// See [`MarkdownPipeline::render`].
pub fn render_markdown(content: &str) -> MarkdownResult<String> {
    MarkdownPipeline::global().render(content)
}

/// Extracts the table of contents of `content` with the global pipeline.
pub fn extract_toc(content: &str) -> Vec<TocEntry> {
    MarkdownPipeline::global().toc(content)
}

/// Renders HTML and table of contents with the global pipeline.
///
/// ## Errors
///
/// See [`MarkdownPipeline::render`].
pub fn render_document(content: &str) -> MarkdownResult<RenderedDocument> {
    MarkdownPipeline::global().render_document(content)
}

/// Builds the global highlighter on a blocking worker thread.
///
/// Call this at startup so the first request does not pay for loading the
/// grammars.
///
/// ## Errors
///
/// Returns the initialization error, or [`MarkdownError::HighlighterInit`]
/// if the worker thread panicked.
pub async fn preload() -> MarkdownResult<()> {
    tokio::task::spawn_blocking(|| MarkdownPipeline::global().highlighter().map(|_| ()))
        .await
        .map_err(|e| MarkdownError::HighlighterInit(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::highlighting::ThemeSource;
    use std::path::PathBuf;
    use tracing_test::traced_test;

    fn pipeline() -> MarkdownPipeline {
        MarkdownPipeline::new(PipelineConfig::default())
    }

    #[test]
    fn test_empty_input() {
        let p = pipeline();
        assert_eq!(p.render("").unwrap(), "");
        assert!(p.toc("").is_empty());
    }

    #[test]
    fn test_toc_does_not_build_highlighter() {
        let p = pipeline();
        let _ = p.toc("# Title\n\n```rust\nfn main() {}\n```");
        assert!(!p.highlighter_ready());
        p.render("# Title").unwrap();
        assert!(p.highlighter_ready());
    }

    #[test]
    fn test_heading_ids_match_toc() {
        let content = "# Intro\n\n## Background *story*\n\n### Detail\n\n# Next";
        let doc = pipeline().render_document(content).unwrap();
        for entry in &doc.toc {
            assert!(
                doc.html.contains(&format!(r#" id="{}""#, entry.id)),
                "missing anchor {}",
                entry.id
            );
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let p = pipeline();
        let content = "# Hi\n\n```js\nconst a = 1;\n```\n\nSee https://example.com (c)";
        assert_eq!(p.render(content).unwrap(), p.render(content).unwrap());
    }

    #[test]
    fn test_linkify_and_typographer_can_be_disabled() {
        let p = MarkdownPipeline::new(
            PipelineConfig::default()
                .with_linkify(false)
                .with_typographer(false),
        );
        let html = p.render("Visit https://example.com (c) \"now\"").unwrap();
        assert!(!html.contains("<a "));
        assert!(html.contains("(c)"));
        assert!(html.contains("&quot;now&quot;") || html.contains("\"now\""));
    }

    #[test]
    fn test_defaults_link_and_typeset() {
        let html = pipeline()
            .render("Visit https://example.com (c) \"now\"")
            .unwrap();
        assert!(html.contains(r#"<a href="https://example.com">https://example.com</a>"#));
        assert!(html.contains('©'));
        assert!(html.contains('“'));
    }

    #[test]
    fn test_email_gets_mailto() {
        let html = pipeline().render("Write to hi@example.com").unwrap();
        assert!(html.contains(r#"href="mailto:hi@example.com""#));
    }

    #[test]
    #[traced_test]
    fn test_broken_theme_file_is_reported_and_retried() {
        let p = MarkdownPipeline::new(PipelineConfig::default().with_theme(ThemeSource::File(
            PathBuf::from("/nonexistent/quill/theme.tmTheme"),
        )));
        assert!(matches!(p.render("# x"), Err(MarkdownError::ThemeLoad { .. })));
        assert!(!p.highlighter_ready());
        assert!(p.render("# x").is_err());
        assert!(logs_contain("Failed to initialize syntax highlighter"));
        assert_eq!(p.toc("# x").len(), 1);
    }

    #[tokio::test]
    async fn test_preload_builds_global_highlighter() {
        preload().await.unwrap();
        assert!(MarkdownPipeline::global().highlighter_ready());
    }
}
