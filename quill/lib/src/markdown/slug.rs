//! Heading slug generation.
//!
//! Slugs double as HTML `id` attributes and as URL fragments in the table of
//! contents, so they are percent-encoded with the same unreserved set the
//! browser-side `encodeURIComponent` uses. Non-ASCII headings (CJK and the
//! like) survive as `%XX` sequences instead of being stripped.
//!
//! ## Examples
//!
//! ```
//! use quill_lib::markdown::slugify;
//!
//! assert_eq!(slugify("  Getting Started "), "getting-started");
//! assert_eq!(slugify("你好 世界"), "%E4%BD%A0%E5%A5%BD-%E4%B8%96%E7%95%8C");
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::HashMap;

/// Characters left untouched by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Whitespace as matched by the ECMAScript `\s` class.
///
/// Unicode `White_Space` minus U+0085, plus the byte-order mark.
fn is_slug_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Generates the anchor slug for a heading's rendered text.
///
/// Lower-cases, trims, collapses every whitespace run to a single `-` and
/// percent-encodes the result. Two headings that normalize to the same text
/// produce the same slug.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim_matches(is_slug_whitespace);

    let mut collapsed = String::with_capacity(trimmed.len());
    let mut in_whitespace = false;
    for c in trimmed.chars() {
        if is_slug_whitespace(c) {
            if !in_whitespace {
                collapsed.push('-');
                in_whitespace = true;
            }
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    utf8_percent_encode(&collapsed, URI_COMPONENT).to_string()
}

/// How repeated headings within one document are assigned ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlugPolicy {
    /// Every heading gets `slugify(text)`; repeated headings share an id.
    #[default]
    Shared,
    /// Repeats get `-1`, `-2`, ... appended; the first keeps the bare slug.
    Unique,
}

/// Per-document slug allocator.
///
/// One `Slugger` is created for each parse, and the ids it hands out are
/// written into the heading tags that both the HTML output and the table of
/// contents read.
#[derive(Debug, Default)]
pub struct Slugger {
    policy: SlugPolicy,
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn new(policy: SlugPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    /// Returns the id for the next heading with the given text.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        match self.policy {
            SlugPolicy::Shared => base,
            SlugPolicy::Unique => self.unique(base),
        }
    }

    fn unique(&mut self, base: String) -> String {
        if !self.seen.contains_key(&base) {
            self.seen.insert(base.clone(), 0);
            return base;
        }

        // A suffixed slug can itself collide with a literal heading text
        // such as "A 1", so keep counting until a free id turns up.
        loop {
            let count = self.seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let candidate = format!("{}-{}", base, count);
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}
