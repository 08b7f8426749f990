//! Typographic symbol replacements.
//!
//! pulldown-cmark's smart punctuation already handles quotes, dashes and
//! ellipses. This pass adds the remaining substitutions authors expect:
//! `(c)` → ©, `(r)` → ®, `(tm)` → ™ (case-insensitive) and `+-` → ±.
//!
//! Text inside code blocks and inside links produced from bare URLs is left
//! untouched so addresses keep their literal spelling.

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::{Captures, Regex};

lazy_static! {
    static ref SYMBOL: Regex =
        Regex::new(r"(?i)\((c|r|tm)\)|\+-").expect("Invalid hardcoded regex: SYMBOL");
}

/// Replaces symbol shorthands in a single string.
///
/// Returns `None` when the text contains nothing to replace.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::inline::typography::replace_symbols;
///
/// assert_eq!(replace_symbols("(C) 2024 Quill(TM)").as_deref(), Some("© 2024 Quill™"));
/// assert_eq!(replace_symbols("plain"), None);
/// ```
pub fn replace_symbols(text: &str) -> Option<String> {
    if !SYMBOL.is_match(text) {
        return None;
    }
    let replaced = SYMBOL.replace_all(text, |caps: &Captures| {
        match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
            Some("c") => "©",
            Some("r") => "®",
            Some("tm") => "™",
            _ => "±",
        }
    });
    Some(replaced.into_owned())
}

/// Applies [`replace_symbols`] to every eligible text event in place.
pub fn apply(events: &mut [Event<'_>]) {
    let mut in_code_block = false;
    let mut autolink_depth = 0usize;
    let mut link_kinds: Vec<bool> = Vec::new();

    for event in events.iter_mut() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::Link { link_type, .. }) => {
                let auto = matches!(link_type, LinkType::Autolink | LinkType::Email);
                if auto {
                    autolink_depth += 1;
                }
                link_kinds.push(auto);
            }
            Event::End(TagEnd::Link) => {
                if link_kinds.pop().unwrap_or(false) {
                    autolink_depth = autolink_depth.saturating_sub(1);
                }
            }
            Event::Text(text) if !in_code_block && autolink_depth == 0 => {
                if let Some(replaced) = replace_symbols(text) {
                    *text = CowStr::from(replaced);
                }
            }
            _ => {}
        }
    }
}
