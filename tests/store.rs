//! Store Integration Tests
//!
//! Saved-content round trips through the panel, against SQLite and a
//! mocked PostgREST endpoint.

use remixer::core::SavedPanel;
use remixer::domain::{NewSavedItem, NoticeKind, Platform, SavedId};
use remixer::store::{SavedStore, SqliteStore, StoreError, SupabaseConfig, SupabaseStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sqlite_panel_round_trip() {
    let temp = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp.path().join("nested").join("saved.db")).unwrap();
    let mut panel = SavedPanel::new();

    let notice = panel
        .save(&store, NewSavedItem::new("First tweet", Platform::Twitter))
        .await;
    assert_eq!(notice.message, "Tweet saved successfully!");
    assert_eq!(panel.items().len(), 1);

    let notice = panel
        .save(&store, NewSavedItem::new("A caption", Platform::Instagram))
        .await;
    assert_eq!(notice.message, "Instagram content saved successfully!");
    assert_eq!(panel.items().len(), 2);

    let id = panel
        .items()
        .iter()
        .find(|item| item.platform == Platform::Twitter)
        .map(|item| item.id.clone())
        .unwrap();

    let notice = panel.edit(&store, &id, "First tweet, edited").await;
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(panel
        .items()
        .iter()
        .any(|item| item.id == id && item.content == "First tweet, edited"));

    let notice = panel.delete(&store, &id).await;
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(panel.items().len(), 1);
    assert_eq!(panel.items()[0].platform, Platform::Instagram);
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("saved.db");

    {
        let store = SqliteStore::open(&db).unwrap();
        store
            .insert(NewSavedItem::new("keep me", Platform::LinkedIn))
            .await
            .unwrap();
    }

    let store = SqliteStore::open(&db).unwrap();
    let items = store.list().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "keep me");
}

#[tokio::test]
async fn test_failed_mutation_keeps_previous_listing() {
    let store = SqliteStore::in_memory().unwrap();
    let mut panel = SavedPanel::new();
    panel
        .save(&store, NewSavedItem::new("still here", Platform::Twitter))
        .await;

    let notice = panel.delete(&store, &SavedId::from("missing")).await;
    assert_eq!(notice.message, "Failed to delete saved content");
    assert_eq!(panel.items().len(), 1);

    let notice = panel.edit(&store, &SavedId::from("missing"), "x").await;
    assert_eq!(notice.message, "Failed to update saved content");
    assert_eq!(panel.items()[0].content, "still here");
}

fn supabase(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(SupabaseConfig::new(server.uri(), "anon-key")).unwrap()
}

#[tokio::test]
async fn test_supabase_insert_sends_row_and_reads_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/saved_content"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!([
            { "content": "hello", "platform": "twitter" }
        ])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 42,
            "content": "hello",
            "platform": "twitter",
            "created_at": "2024-11-02T10:00:00+00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let saved = supabase(&server)
        .insert(NewSavedItem::new("hello", Platform::Twitter))
        .await
        .unwrap();

    assert_eq!(saved.id, SavedId::from("42"));
    assert_eq!(saved.platform, Platform::Twitter);
}

#[tokio::test]
async fn test_supabase_list_orders_and_skips_unknown_platforms() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/saved_content"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "content": "new", "platform": "linkedin", "created_at": "2024-11-03T10:00:00Z" },
            { "id": 9, "content": "old", "platform": "myspace", "created_at": "2024-11-02T10:00:00Z" },
            { "id": 1, "content": "older", "platform": "instagram", "created_at": "2024-11-01T10:00:00Z" }
        ])))
        .mount(&server)
        .await;

    let items = supabase(&server).list().await.unwrap();
    let contents: Vec<_> = items.iter().map(|i| i.content.as_str()).collect();
    assert_eq!(contents, vec!["new", "older"]);
}

#[tokio::test]
async fn test_supabase_update_filters_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/saved_content"))
        .and(query_param("id", "eq.7"))
        .and(body_partial_json(json!({ "content": "edited" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "content": "edited",
            "platform": "instagram",
            "created_at": "2024-11-02T10:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let item = supabase(&server)
        .update_content(&SavedId::from("7"), "edited")
        .await
        .unwrap();
    assert_eq!(item.content, "edited");
}

#[tokio::test]
async fn test_supabase_delete_of_missing_row_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/saved_content"))
        .and(query_param("id", "eq.404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = supabase(&server)
        .delete(&SavedId::from("404"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_supabase_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/saved_content"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let store = supabase(&server);
    match store.list().await.unwrap_err() {
        StoreError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    // The panel turns it into a notice
    let mut panel = SavedPanel::new();
    let notice = panel.refresh(&store).await.unwrap();
    assert_eq!(notice.message, "Failed to load saved content");
}
