//! Table of contents extraction.
//!
//! The outline is read from the headings recorded by the anchor pass of a
//! [`ParsedDocument`], never from a second, independently configured parse.
//! That is what keeps every entry's `id` identical to the `id` attribute on
//! the heading in the rendered HTML.
//!
//! ## Examples
//!
//! ```
//! use quill_lib::markdown::extract_toc;
//!
//! let toc = extract_toc("# Intro\n\n## Background\n\n#### Too deep");
//! assert_eq!(toc.len(), 2);
//! assert_eq!(toc[1].id, "background");
//! assert_eq!(toc[1].level, 2);
//! ```

mod types;

pub use types::TocEntry;

use crate::markdown::ParsedDocument;

/// Builds the table of contents for a parsed document.
///
/// Only headings that received an anchor (levels 1-3 with non-empty text)
/// produce an entry. Entries keep document order and are not deduplicated.
pub fn from_document(document: &ParsedDocument<'_>) -> Vec<TocEntry> {
    document
        .headings()
        .iter()
        .filter_map(|heading| {
            heading.id.as_ref().map(|id| TocEntry {
                id: id.clone(),
                text: heading.text.clone(),
                level: heading.level,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{MarkdownPipeline, PipelineConfig};

    fn toc(content: &str) -> Vec<TocEntry> {
        MarkdownPipeline::new(PipelineConfig::default()).toc(content)
    }

    #[test]
    fn test_empty_input() {
        assert!(toc("").is_empty());
    }

    #[test]
    fn test_document_without_headings() {
        assert!(toc("Just a paragraph.\n\n- and a list").is_empty());
    }

    #[test]
    fn test_order_and_levels() {
        let entries = toc("# Intro\n\n## Background\n\n### Detail\n\n# Next");
        let levels: Vec<u8> = entries.iter().map(|e| e.level).collect();
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(levels, vec![1, 2, 3, 1]);
        assert_eq!(texts, vec!["Intro", "Background", "Detail", "Next"]);
    }

    #[test]
    fn test_levels_four_to_six_are_skipped() {
        let entries = toc("#### Four\n\n##### Five\n\n###### Six\n\n## Two");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Two");
    }

    #[test]
    fn test_text_is_rendered_not_raw() {
        let entries = toc("## The **bold** _move_");
        assert_eq!(entries[0].text, "The bold move");
        assert_eq!(entries[0].id, "the-bold-move");
    }

    #[test]
    fn test_duplicate_headings_share_id() {
        let entries = toc("# A\n\ntext\n\n# A");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "a");
        assert_eq!(entries[1].id, "a");
    }

    #[test]
    fn test_heading_inside_code_block_is_not_an_entry() {
        let entries = toc("```md\n# not a heading\n```\n\n# Real");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Real");
    }

    #[test]
    fn test_href() {
        let entries = toc("# Hello World");
        assert_eq!(entries[0].href(), "#hello-world");
    }
}
