//! Heading anchor injection.
//!
//! Runs over the parsed event stream once per document, derives each
//! heading's plain text, allocates its id from the document's [`Slugger`] and
//! writes the id into the heading tag. The HTML writer and the table of
//! contents both read the result of this single pass.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use std::ops::RangeInclusive;

use crate::markdown::Slugger;

/// Heading levels that receive an anchor id and a TOC entry.
pub const ANCHOR_LEVELS: RangeInclusive<u8> = 1..=3;

/// A heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Rendered plain text of the heading, trimmed.
    pub text: String,
    /// Anchor id; `None` for levels outside [`ANCHOR_LEVELS`] and for
    /// headings without text.
    pub id: Option<String>,
}

/// Converts pulldown_cmark HeadingLevel to u8.
pub(crate) fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Heading location and text gathered in the read-only pass.
struct HeadingExtract {
    start: usize,
    level: u8,
    text: String,
}

/// Collects the plain text of every heading, in document order.
///
/// Text and inline code contribute their literal content, line breaks become
/// a space, and images, raw HTML and math contribute nothing.
fn extract_headings(events: &[Event<'_>]) -> Vec<HeadingExtract> {
    let mut headings = Vec::new();
    let mut current: Option<HeadingExtract> = None;
    let mut image_depth = 0usize;

    for (idx, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(HeadingExtract {
                    start: idx,
                    level: heading_level_to_u8(*level),
                    text: String::new(),
                });
                image_depth = 0;
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    headings.push(heading);
                }
            }
            Event::Start(Tag::Image { .. }) if current.is_some() => image_depth += 1,
            Event::End(TagEnd::Image) if current.is_some() => {
                image_depth = image_depth.saturating_sub(1);
            }
            Event::Text(text) | Event::Code(text) if image_depth == 0 => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

/// Assigns anchor ids to headings and returns them in document order.
pub(crate) fn assign_ids(events: &mut [Event<'_>], slugger: &mut Slugger) -> Vec<Heading> {
    let extracts = extract_headings(events);
    let mut headings = Vec::with_capacity(extracts.len());

    for extract in extracts {
        let text = extract.text.trim().to_string();
        let id = if ANCHOR_LEVELS.contains(&extract.level) && !text.is_empty() {
            Some(slugger.slug(&text)).filter(|slug| !slug.is_empty())
        } else {
            None
        };

        if let Some(ref anchor) = id
            && let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[extract.start]
        {
            *slot = Some(CowStr::from(anchor.clone()));
        }

        headings.push(Heading {
            level: extract.level,
            text,
            id,
        });
    }

    headings
}
