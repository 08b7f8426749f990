//! Type definitions for the table of contents.

use serde::{Deserialize, Serialize};

/// One entry of a document's table of contents.
///
/// `id` is the anchor carried by the matching heading element in the
/// rendered HTML, so `#{id}` links resolve in-page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Anchor id of the heading.
    pub id: String,
    /// Rendered plain text of the heading.
    pub text: String,
    /// Heading level, 1 through 3.
    pub level: u8,
}

impl TocEntry {
    /// Returns the in-page link target for this entry (`#id`).
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}
