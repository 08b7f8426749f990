//! Inline extensions that pulldown-cmark does not provide natively.
//!
//! - [`Linkify`] turns bare URLs and e-mail addresses in text into links.
//! - [`typography::apply`] performs the symbol replacements (`(c)`, `(tm)`,
//!   `+-`, ...) that complement pulldown-cmark's smart punctuation.
//!
//! ## Examples
//!
//! ```
//! use pulldown_cmark::{Event, Parser, Tag, TextMergeStream};
//! use quill_lib::markdown::inline::Linkify;
//!
//! let parser = TextMergeStream::new(Parser::new("Visit https://example.com today."));
//! let events: Vec<_> = Linkify::new(parser).collect();
//!
//! assert!(events.iter().any(|e| matches!(e, Event::Start(Tag::Link { .. }))));
//! ```

pub mod typography;

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;
use std::collections::VecDeque;

lazy_static! {
    /// Bare URLs (`http`, `https`, `ftp`, or a `www.` host) and e-mail addresses.
    static ref LINK_CANDIDATE: Regex = Regex::new(
        r#"(?i)(?P<url>\b(?:(?:https?|ftp)://|www\.)[^\s<>"“”‘]+)|(?P<email>\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b)"#
    )
    .expect("Invalid hardcoded regex: LINK_CANDIDATE");
}

/// Iterator adapter that links bare URLs and e-mail addresses.
///
/// Text inside existing links, images, inline `<a>` HTML and code blocks is
/// left alone. Wrap the parser in [`pulldown_cmark::TextMergeStream`] first
/// so a URL is never split across two text events.
pub struct Linkify<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    inner: I,
    pending: VecDeque<Event<'a>>,
    link_depth: usize,
    html_anchor_depth: usize,
    in_code_block: bool,
}

impl<'a, I> Linkify<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            link_depth: 0,
            html_anchor_depth: 0,
            in_code_block: false,
        }
    }

    fn linking_allowed(&self) -> bool {
        self.link_depth == 0 && self.html_anchor_depth == 0 && !self.in_code_block
    }

    fn track_inline_html(&mut self, html: &str) {
        let tag = html.trim_start().to_ascii_lowercase();
        if tag.starts_with("</a>") || tag.starts_with("</a ") {
            self.html_anchor_depth = self.html_anchor_depth.saturating_sub(1);
        } else if (tag.starts_with("<a ") || tag.starts_with("<a>")) && !tag.ends_with("/>") {
            self.html_anchor_depth += 1;
        }
    }

    /// Splits `text` around link candidates.
    ///
    /// Returns `false` when nothing was found, so the caller can pass the
    /// original event through without allocating.
    fn process_text(&mut self, text: &str) -> bool {
        let mut segments: VecDeque<Event<'a>> = VecDeque::new();
        let mut cursor = 0;

        for caps in LINK_CANDIDATE.captures_iter(text) {
            let (m, link_type, raw) = if let Some(m) = caps.name("url") {
                (m, LinkType::Autolink, trim_url(m.as_str()))
            } else if let Some(m) = caps.name("email") {
                (m, LinkType::Email, m.as_str())
            } else {
                continue;
            };

            if raw.is_empty() || (link_type == LinkType::Autolink && !has_host(raw)) {
                continue;
            }

            if m.start() > cursor {
                segments.push_back(Event::Text(CowStr::from(
                    text[cursor..m.start()].to_string(),
                )));
            }

            let dest_url = if link_type == LinkType::Autolink
                && raw.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www."))
            {
                format!("http://{}", raw)
            } else {
                raw.to_string()
            };

            segments.push_back(Event::Start(Tag::Link {
                link_type,
                dest_url: CowStr::from(dest_url),
                title: CowStr::from(""),
                id: CowStr::from(""),
            }));
            segments.push_back(Event::Text(CowStr::from(raw.to_string())));
            segments.push_back(Event::End(TagEnd::Link));

            cursor = m.start() + raw.len();
        }

        if segments.is_empty() {
            return false;
        }

        if cursor < text.len() {
            segments.push_back(Event::Text(CowStr::from(text[cursor..].to_string())));
        }

        self.pending = segments;
        true
    }
}

impl<'a, I> Iterator for Linkify<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.inner.next()?;
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => self.link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => {
                self.link_depth = self.link_depth.saturating_sub(1);
            }
            Event::Start(Tag::CodeBlock(_)) => self.in_code_block = true,
            Event::End(TagEnd::CodeBlock) => self.in_code_block = false,
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::TableCell | TagEnd::Item,
            ) => self.html_anchor_depth = 0,
            Event::InlineHtml(html) => self.track_inline_html(html),
            Event::Text(text) if self.linking_allowed() => {
                if self.process_text(text) {
                    return self.pending.pop_front();
                }
            }
            _ => {}
        }

        Some(event)
    }
}

/// Drops trailing punctuation that belongs to the sentence, not the URL.
///
/// A closing parenthesis is kept when it balances one inside the URL, as in
/// `https://en.wikipedia.org/wiki/Rust_(programming_language)`.
fn trim_url(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let candidate = &url[..end];
        let Some(last) = candidate.chars().next_back() else {
            break;
        };
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '’' | '*' | '_' => true,
            ')' => candidate.matches(')').count() > candidate.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}

/// Rejects bare prefixes such as `https://` or `www.` with nothing after them.
///
/// `url` has already been through [`trim_url`], so a `www.` match may be
/// shorter than the prefix itself.
fn has_host(url: &str) -> bool {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => url.get(4..).unwrap_or(""),
    };
    rest.chars().any(|c| c.is_alphanumeric())
}
