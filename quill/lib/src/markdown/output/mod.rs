//! HTML output for parsed Markdown documents.
//!
//! ## Examples
//!
//! ```
//! use quill_lib::markdown::render_document;
//!
//! let doc = render_document("# Hello\n\nWorld").unwrap();
//! assert!(doc.html.contains(r#"<h1 id="hello">"#));
//! assert_eq!(doc.toc[0].id, "hello");
//! ```

mod html;
pub mod math;

pub(crate) use html::render_html;

use serde::{Deserialize, Serialize};

use crate::markdown::TocEntry;

/// HTML and table of contents produced from one parse of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// The rendered HTML body.
    #[serde(rename = "htmlContent")]
    pub html: String,
    /// Headings of levels 1-3, in document order.
    pub toc: Vec<TocEntry>,
}
