//! Rendering pipeline configuration.
//!
//! Everything that influences how a document is parsed lives here, so the
//! renderer and the table-of-contents extractor can never be configured
//! differently.

use pulldown_cmark::Options;
use std::path::PathBuf;

use crate::markdown::SlugPolicy;
use crate::markdown::highlighting::{CodeTheme, ThemeSource};

/// Environment variable selecting an embedded code theme by name.
pub const CODE_THEME_ENV: &str = "QUILL_CODE_THEME";
/// Environment variable pointing at a `.tmTheme` file; wins over the name.
pub const THEME_FILE_ENV: &str = "QUILL_THEME_FILE";
/// Environment variable enabling unique heading slugs.
pub const UNIQUE_SLUGS_ENV: &str = "QUILL_UNIQUE_SLUGS";

/// Options for a [`crate::markdown::MarkdownPipeline`] with sensible defaults.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::{PipelineConfig, SlugPolicy};
/// use quill_lib::markdown::highlighting::{CodeTheme, ThemeSource};
///
/// let config = PipelineConfig::default()
///     .with_theme(ThemeSource::Embedded(CodeTheme::Dracula))
///     .with_slug_policy(SlugPolicy::Unique);
/// assert!(config.linkify);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct PipelineConfig {
    /// The single code theme used for every highlighted block.
    pub theme: ThemeSource,
    /// How repeated headings are assigned ids.
    pub slug_policy: SlugPolicy,
    /// Turn bare URLs and e-mail addresses into links.
    pub linkify: bool,
    /// Curly quotes, dashes, ellipses and symbol replacements.
    pub typographer: bool,
    /// Recognize `$...$` and `$$...$$` math.
    pub math: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            theme: ThemeSource::default(),
            slug_policy: SlugPolicy::default(),
            linkify: true,
            typographer: true,
            math: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_theme(mut self, theme: ThemeSource) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_slug_policy(mut self, slug_policy: SlugPolicy) -> Self {
        self.slug_policy = slug_policy;
        self
    }

    pub fn with_linkify(mut self, linkify: bool) -> Self {
        self.linkify = linkify;
        self
    }

    pub fn with_typographer(mut self, typographer: bool) -> Self {
        self.typographer = typographer;
        self
    }

    pub fn with_math(mut self, math: bool) -> Self {
        self.math = math;
        self
    }

    /// Reads the configuration from `QUILL_*` environment variables.
    ///
    /// An unknown theme name falls back to the default theme with a warning;
    /// an unreadable theme file is reported when the highlighter is built.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(THEME_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            config.theme = ThemeSource::File(PathBuf::from(path));
        } else if let Some(name) = lookup(CODE_THEME_ENV) {
            match CodeTheme::try_from(name.as_str()) {
                Ok(theme) => config.theme = ThemeSource::Embedded(theme),
                Err(e) => tracing::warn!(
                    env_var = CODE_THEME_ENV,
                    error = %e,
                    "Ignoring invalid code theme, using default"
                ),
            }
        }

        if lookup(UNIQUE_SLUGS_ENV).as_deref().is_some_and(is_truthy) {
            config.slug_policy = SlugPolicy::Unique;
        }

        tracing::info!(
            theme = %config.theme.label(),
            slug_policy = ?config.slug_policy,
            "Detected pipeline configuration"
        );

        config
    }

    /// pulldown-cmark options for this configuration.
    ///
    /// Tables and strikethrough are always on, matching the usual blog
    /// dialect.
    pub fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        if self.typographer {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        if self.math {
            options.insert(Options::ENABLE_MATH);
        }
        options
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
