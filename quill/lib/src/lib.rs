//! Markdown rendering for a blog backend.
//!
//! - [`markdown`] turns article bodies into HTML with heading anchors, a
//!   matching table of contents and syntax highlighted code blocks.
//! - [`article`] projects stored articles into the view models served by the
//!   detail page.

pub mod article;
pub mod markdown;
