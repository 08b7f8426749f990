//! Event stream to HTML serialization.
//!
//! Fenced code blocks are collected and handed to the [`CodeHighlighter`];
//! math becomes KaTeX-ready markup. Everything else, including heading ids
//! set by the anchor pass and raw HTML, is written by pulldown-cmark's own
//! HTML writer.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd, html};

use crate::markdown::highlighting::CodeHighlighter;
use crate::markdown::output::math;

/// State of a fenced block being collected.
struct FencedBlock {
    lang: String,
    code: String,
}

/// Serializes a parsed event stream to HTML.
pub(crate) fn render_html<'a, I>(events: I, highlighter: &CodeHighlighter) -> String
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut transformed: Vec<Event<'a>> = Vec::new();
    let mut fenced: Option<FencedBlock> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                fenced = Some(FencedBlock {
                    lang: fence_language(&info).to_string(),
                    code: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) if fenced.is_some() => {
                if let Some(block) = fenced.take() {
                    let highlighted = highlighter.highlight(&block.code, &block.lang);
                    transformed.push(Event::Html(CowStr::from(highlighted)));
                }
            }
            Event::Text(text) if fenced.is_some() => {
                if let Some(block) = fenced.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::InlineMath(tex) => {
                transformed.push(Event::InlineHtml(CowStr::from(math::inline_math(&tex))));
            }
            Event::DisplayMath(tex) => {
                transformed.push(Event::InlineHtml(CowStr::from(math::display_math(&tex))));
            }
            other => transformed.push(other),
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, transformed.into_iter());
    output
}

/// The language tag of a fence info string: its first word.
fn fence_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::highlighting::ThemeSource;
    use pulldown_cmark::{Options, Parser};

    fn render(content: &str) -> String {
        let highlighter = CodeHighlighter::load(&ThemeSource::default()).unwrap();
        let parser = Parser::new_ext(content, Options::ENABLE_MATH | Options::ENABLE_TABLES);
        render_html(parser, &highlighter)
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust ignore"), "rust");
        assert_eq!(fence_language("  py"), "py");
        assert_eq!(fence_language(""), "");
    }

    #[test]
    fn test_fenced_code_is_highlighted() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"data-lang="rust""#));
        assert!(html.contains("<span style="));
    }

    #[test]
    fn test_unknown_fence_is_plain() {
        let html = render("```fooscript\nx=1\n```\n");
        assert_eq!(html, "<pre><code>x=1\n</code></pre>\n");
    }

    #[test]
    fn test_indented_code_is_plain() {
        let html = render("    let x = 1;\n");
        assert_eq!(html, "<pre><code>let x = 1;\n</code></pre>\n");
    }

    #[test]
    fn test_unclosed_fence_is_rendered() {
        let html = render("```py\nprint('hi')\n");
        assert!(html.contains("print"));
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn test_math_markup() {
        let html = render("Euler: $e^{i\\pi} + 1 = 0$\n\n$$\nx < y\n$$\n");
        assert!(html.contains(r#"<span class="math math-inline">\(e^{i\pi} + 1 = 0\)</span>"#));
        assert!(html.contains(r#"<span class="math math-display">\["#));
        assert!(html.contains("x &lt; y"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render("<div class=\"note\">hi</div>\n\nText with <kbd>Ctrl</kbd>.");
        assert!(html.contains("<div class=\"note\">hi</div>"));
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_tables() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}
