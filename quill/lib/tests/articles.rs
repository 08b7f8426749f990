//! Integration tests for article detail pages.

mod common;

use chrono::{TimeZone, Utc};
use common::fixture_path;
use quill_lib::article::{ArticleError, ArticleService, MemoryRepository};
use quill_lib::markdown::{MarkdownPipeline, PipelineConfig};

fn service(pipeline: &MarkdownPipeline) -> ArticleService<'_, MemoryRepository> {
    let repo = MemoryRepository::from_path(&fixture_path("articles.json")).unwrap();
    ArticleService::with_pipeline(repo, pipeline)
}

#[tokio::test]
async fn test_page_by_slug() {
    let pipeline = MarkdownPipeline::new(PipelineConfig::default());
    let page = service(&pipeline).page("hello-quill").await.unwrap();
    let article = &page.article;

    assert_eq!(article.item.id, "65f1c0ffee00000000000001");
    assert_eq!(article.item.cover_image, "/covers/hello.png");
    assert_eq!(article.item.views, 12);
    assert!(article.item.is_top);
    assert_eq!(article.item.category.as_ref().unwrap().slug, "notes");
    assert_eq!(article.item.tags.len(), 1);
    assert_eq!(article.item.published_at, "2024-01-10T08:00:00.000Z");

    assert!(article.content.contains(r#"<h2 id="why">Why</h2>"#));
    assert_eq!(article.toc.len(), 2);
    assert_eq!(article.toc[1].id, "why");

    assert_eq!(page.prev_article.as_ref().unwrap().slug, "oldest");
    assert_eq!(page.next_article.as_ref().unwrap().slug, "second-post");
}

#[tokio::test]
async fn test_page_by_id_skips_drafts_for_neighbors() {
    let pipeline = MarkdownPipeline::new(PipelineConfig::default());
    let page = service(&pipeline)
        .page("65f1c0ffee00000000000003")
        .await
        .unwrap();
    assert_eq!(page.article.item.slug, "second-post");
    assert!(page.article.item.tags.is_empty());
    assert_eq!(page.prev_article.unwrap().slug, "hello-quill");
    assert!(page.next_article.is_none());
}

#[tokio::test]
async fn test_draft_is_not_found() {
    let pipeline = MarkdownPipeline::new(PipelineConfig::default());
    let err = service(&pipeline).page("draft").await.unwrap_err();
    assert!(matches!(err, ArticleError::NotFound(_)));
}

#[tokio::test]
async fn test_missing_timestamps_default_to_now() {
    let pipeline = MarkdownPipeline::new(PipelineConfig::default());
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let page = service(&pipeline).page_at("oldest", now).await.unwrap();
    assert_eq!(page.article.item.created_at, "2025-01-01T00:00:00.000Z");
    assert_eq!(page.article.item.published_at, "2023-06-01T00:00:00.000Z");
    assert_eq!(page.article.content, "");
}

#[tokio::test]
async fn test_page_wire_shape() {
    let pipeline = MarkdownPipeline::new(PipelineConfig::default());
    let page = service(&pipeline).page("second-post").await.unwrap();
    let value = serde_json::to_value(&page).unwrap();

    assert_eq!(value["article"]["_id"], "65f1c0ffee00000000000003");
    assert_eq!(value["article"]["isPublished"], true);
    assert_eq!(value["article"]["toc"][0]["id"], "second");
    assert_eq!(value["article"]["toc"][1]["id"], "second");
    assert_eq!(value["prevArticle"]["title"], "Hello Quill");
    assert!(value["nextArticle"].is_null());
}

#[tokio::test]
async fn test_list_newest_first_without_drafts() {
    let pipeline = MarkdownPipeline::new(PipelineConfig::default());
    let items = service(&pipeline).list().await.unwrap();
    let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["second-post", "hello-quill", "oldest"]);
    assert_eq!(items[1].tags.len(), 1);
}
