use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
use uuid::Uuid;

use pressroom_core::domain::{ComponentType, PageChanges, Post, PostPatch};
use pressroom_core::error::RepoError;
use pressroom_core::ports::{BaseRepository, PageRepository, PostRepository};

use crate::database::entity::{page, post};
use crate::database::postgres_repo::{PostgresPageRepository, PostgresPostRepository};

fn post_model(slug: &str, views: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        title: "Hello".to_owned(),
        slug: slug.to_owned(),
        content: "<p>Body</p>".to_owned(),
        excerpt: None,
        category: "News".to_owned(),
        tags: serde_json::json!(["rust", "web"]),
        author_id: Uuid::new_v4(),
        featured_image: None,
        is_published: true,
        views,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn page_model(slug: &str) -> page::Model {
    let now = Utc::now();
    page::Model {
        id: Uuid::new_v4(),
        title: "About".to_owned(),
        slug: slug.to_owned(),
        layout: serde_json::json!([]),
        components: serde_json::json!([
            {"id": "comp-1", "type": "text", "content": "<p>Hi</p>",
             "position": {"x": 0, "y": 0}, "size": {"width": "100%", "height": "auto"},
             "styles": {"color": "red"}},
            {"id": "comp-2", "type": "carousel", "content": "x",
             "position": {"x": 0, "y": 100}, "size": {"width": "100%", "height": "auto"},
             "styles": {}},
            "garbage"
        ]),
        created_by: Uuid::new_v4(),
        is_published: true,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_published_page_decodes_components() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![page_model("about")]])
        .into_connection();

    let repo = PostgresPageRepository::new(db);
    let page = repo.find_published_by_slug("about").await.unwrap().unwrap();

    assert_eq!(page.slug, "about");
    assert_eq!(page.components.len(), 2);
    assert_eq!(
        page.components[0].kind.component_type(),
        Some(ComponentType::Text)
    );
    assert_eq!(page.components[1].kind.type_name(), "carousel");
}

#[tokio::test]
async fn test_record_view_returns_incremented_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model("hello", 8)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.record_view("hello").await.unwrap().unwrap();

    assert_eq!(post.views, 8);
    assert_eq!(post.tags, vec!["rust".to_string(), "web".to_string()]);
}

#[tokio::test]
async fn test_update_owned_miss_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let patch = PostPatch {
        title: Some("New".to_string()),
        ..Default::default()
    };
    let result = repo
        .update_owned(Uuid::new_v4(), Uuid::new_v4(), patch, Utc::now())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_page_returns_row() {
    let model = page_model("about");
    let id = model.id;
    let owner = model.created_by;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPageRepository::new(db);
    let changes = PageChanges {
        is_published: Some(true),
        ..Default::default()
    };
    let page = repo
        .update_owned(id, owner, changes, Utc::now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(page.id, id);
}

#[tokio::test]
async fn test_delete_owned_reports_rows_affected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.delete_owned(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
    assert!(!repo.delete_owned(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model("hello", 0);
    let id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(id).await.unwrap();

    assert_eq!(result.unwrap().id, id);
}

#[tokio::test]
async fn test_query_failure_maps_to_query_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
            "boom".to_string(),
        ))])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.list_by_author(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::Query(_))));
}
