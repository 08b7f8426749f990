//! Article detail pages.
//!
//! Stored records are projected into fully defaulted view models here, at
//! the data-access boundary, and the Markdown body is rendered together with
//! its table of contents.
//!
//! ## Examples
//!
//! ```
//! use quill_lib::article::{ArticleService, MemoryRepository};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let repo = MemoryRepository::from_json(
//!     r##"[{ "_id": "a", "slug": "hello", "content": "# Hi" }]"##,
//! ).unwrap();
//! let page = ArticleService::new(repo).page("hello").await.unwrap();
//! assert_eq!(page.article.toc[0].id, "hi");
//! # });
//! ```

mod error;
mod repository;
mod service;
mod types;

pub use error::{ArticleError, ArticleResult};
pub use repository::{ArticleKey, ArticleRepository, MemoryRepository, Neighbors};
pub use service::ArticleService;
pub use types::{
    ArticleDetail, ArticleListItem, ArticleNeighbor, ArticlePage, ArticleRecord, CategoryView,
    RecordDate, RecordId, Reference, TagList, TagView, TaxonomyRecord,
};
