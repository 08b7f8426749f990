//! Syntax highlighting for fenced code blocks.
//!
//! [`CodeHighlighter`] bundles the grammar set and the one code theme used for
//! every page. Building it is the expensive part of rendering, so pipelines
//! construct it once (see [`crate::markdown::MarkdownPipeline`]) and share it
//! read-only afterwards.
//!
//! Highlighting itself never fails from the caller's point of view: unknown
//! languages and engine errors both degrade to an escaped, uncoloured block.

mod grammars;
mod themes;

pub use grammars::supported_token;
pub use themes::{CodeTheme, InvalidThemeName, ThemeSource};

use std::time::Instant;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Style, Theme as SyntectTheme};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::markdown::{MarkdownError, MarkdownResult};

/// Grammar set plus a single theme.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::highlighting::{CodeHighlighter, ThemeSource};
///
/// let highlighter = CodeHighlighter::load(&ThemeSource::default()).unwrap();
/// let html = highlighter.highlight("let x = 1;\n", "rust");
/// assert!(html.starts_with("<pre class=\"quill-code"));
/// ```
#[derive(Debug)]
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme: SyntectTheme,
    theme_label: String,
}

impl CodeHighlighter {
    /// Builds a highlighter for the given theme source.
    ///
    /// ## Errors
    ///
    /// Returns an error if the theme cannot be loaded or no grammars are
    /// available.
    pub fn load(source: &ThemeSource) -> MarkdownResult<Self> {
        let started = Instant::now();

        let theme = themes::load_theme(source)?;
        let syntax_set = grammars::load_syntax_set();
        if syntax_set.syntaxes().is_empty() {
            return Err(MarkdownError::HighlighterInit(
                "no grammars were loaded".to_string(),
            ));
        }

        let theme_label = source.label();
        tracing::info!(
            theme = %theme_label,
            grammars = syntax_set.syntaxes().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Syntax highlighter initialized"
        );

        Ok(Self {
            syntax_set,
            theme,
            theme_label,
        })
    }

    /// Returns a reference to the syntax set.
    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    /// Returns a reference to the theme.
    pub fn theme(&self) -> &SyntectTheme {
        &self.theme
    }

    /// Returns the label of the theme in use.
    pub fn theme_label(&self) -> &str {
        &self.theme_label
    }

    /// Returns `true` if `lang` would be rendered with colour.
    pub fn supports(&self, lang: &str) -> bool {
        grammars::find_syntax(&self.syntax_set, lang).is_some()
    }

    /// Renders `code` as an HTML `<pre>` block.
    ///
    /// Allow-listed languages get themed `<span>` runs; everything else, and
    /// any highlighting error, yields [`plain_code_block`].
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let lang = lang.trim();
        if lang.is_empty() {
            return plain_code_block(code);
        }

        let Some(syntax) = grammars::find_syntax(&self.syntax_set, lang) else {
            tracing::debug!(lang, "Unsupported code block language, rendering plain");
            return plain_code_block(code);
        };

        or_plain(code, lang, self.try_highlight(code, lang, syntax))
    }

    fn try_highlight(
        &self,
        code: &str,
        lang: &str,
        syntax: &SyntaxReference,
    ) -> Result<String, syntect::Error> {
        let mut hl = HighlightLines::new(syntax, &self.theme);
        let mut output = String::with_capacity(code.len() * 4);

        output.push_str(&format!(
            r#"<pre class="quill-code {}" data-lang="{}" style="{}"><code>"#,
            html_escape::encode_double_quoted_attribute(&self.theme_label),
            html_escape::encode_double_quoted_attribute(&lang.to_lowercase()),
            block_style(&self.theme)
        ));

        for line in LinesWithEndings::from(code) {
            let ranges = hl.highlight_line(line, &self.syntax_set)?;
            for (style, text) in ranges {
                output.push_str(&format!(
                    r#"<span style="{}">{}</span>"#,
                    span_style(style),
                    html_escape::encode_text(text)
                ));
            }
        }

        output.push_str("</code></pre>\n");
        Ok(output)
    }
}

/// Escaped, uncoloured code block used for unknown languages and failures.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::highlighting::plain_code_block;
///
/// assert_eq!(plain_code_block("a < b\n"), "<pre><code>a &lt; b\n</code></pre>\n");
/// ```
pub fn plain_code_block(code: &str) -> String {
    format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(code))
}

/// Recovers from an engine error with the plain block.
fn or_plain(code: &str, lang: &str, highlighted: Result<String, syntect::Error>) -> String {
    match highlighted {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(lang, error = %e, "Syntax highlighting failed, rendering plain");
            plain_code_block(code)
        }
    }
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn block_style(theme: &SyntectTheme) -> String {
    let mut style = String::new();
    if let Some(bg) = theme.settings.background {
        style.push_str(&format!("background-color:{};", hex(bg)));
    }
    if let Some(fg) = theme.settings.foreground {
        style.push_str(&format!("color:{};", hex(fg)));
    }
    style
}

fn span_style(style: Style) -> String {
    let mut css = format!("color:{};", hex(style.foreground));
    if style.font_style.contains(FontStyle::BOLD) {
        css.push_str("font-weight:bold;");
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        css.push_str("font-style:italic;");
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        css.push_str("text-decoration:underline;");
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntect::parsing::ParsingError;
    use tracing_test::traced_test;

    fn highlighter() -> CodeHighlighter {
        CodeHighlighter::load(&ThemeSource::default()).unwrap()
    }

    #[test]
    fn test_empty_lang_renders_plain() {
        let html = highlighter().highlight("x = 1\n", "");
        assert_eq!(html, "<pre><code>x = 1\n</code></pre>\n");
    }

    #[test]
    fn test_unknown_lang_renders_plain_and_escaped() {
        let html = highlighter().highlight("if a < b && c\n", "fooscript");
        assert_eq!(html, "<pre><code>if a &lt; b &amp;&amp; c\n</code></pre>\n");
        assert!(!html.contains("<span"));
    }

    #[test]
    fn test_known_lang_renders_spans() {
        let html = highlighter().highlight("fn main() {}\n", "rust");
        assert!(html.starts_with(r#"<pre class="quill-code one-half-dark" data-lang="rust""#));
        assert!(html.contains("<span style=\"color:#"));
        assert!(html.contains("main"));
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn test_lang_match_is_case_insensitive() {
        let html = highlighter().highlight("print('hi')\n", "PYTHON");
        assert!(html.contains(r#"data-lang="python""#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_highlighted_code_is_escaped() {
        let html = highlighter().highlight("<div class=\"a\"></div>\n", "html");
        assert!(html.contains("&lt;"));
        assert!(!html.contains("<div class"));
    }

    #[test]
    fn test_block_carries_theme_background() {
        let hl = highlighter();
        let bg = hl.theme().settings.background.unwrap();
        let html = hl.highlight("SELECT 1;\n", "sql");
        assert!(html.contains(&format!("background-color:{};", hex(bg))));
    }

    #[test]
    fn test_supports() {
        let hl = highlighter();
        assert!(hl.supports("js"));
        assert!(hl.supports("Bash"));
        assert!(!hl.supports("cobol"));
        assert!(!hl.supports(""));
    }

    #[test]
    #[traced_test]
    fn test_engine_error_falls_back_to_plain() {
        let failed = Err(syntect::Error::ParsingError(ParsingError::MissingMainContext));
        let html = or_plain("if a < b {}\n", "rust", failed);
        assert_eq!(html, "<pre><code>if a &lt; b {}\n</code></pre>\n");
        assert!(logs_contain("Syntax highlighting failed"));
        assert!(logs_contain("rust"));
    }

    #[test]
    fn test_successful_highlight_is_kept() {
        let html = or_plain("x\n", "rust", Ok("<pre>ok</pre>".to_string()));
        assert_eq!(html, "<pre>ok</pre>");
    }

    #[test]
    #[traced_test]
    fn test_unknown_lang_is_logged() {
        let _ = highlighter().highlight("x\n", "fooscript");
        assert!(logs_contain("Unsupported code block language"));
    }
}
