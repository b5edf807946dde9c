//! Poem API integration tests
//!
//! CRUD, ownership, and popularity bookkeeping through the HTTP surface.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use stanza::backend::poems::DeletedResponse;
use stanza::backend::store::{ContentStore, IdentityStore, NewPoem};
use stanza::shared::{PoemView, ReadResponse};
use uuid::Uuid;

use crate::common::{create_poem, register_unique_user, register_user, test_app, TestApp};

async fn popularity(app: &TestApp, user: Uuid) -> i64 {
    app.store
        .find_user_by_id(user)
        .await
        .unwrap()
        .unwrap()
        .popularity
}

async fn read(app: &TestApp, token: &str, poem: Uuid) -> ReadResponse {
    let response = app
        .server
        .post(&format!("/api/poems/{poem}/read"))
        .authorization_bearer(token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_read_and_delete_scenario() {
    let app = test_app();
    let a = register_user(&app.server, "A", "a@example.com").await;
    let b = register_user(&app.server, "B", "b@example.com").await;
    let c = register_user(&app.server, "C", "c@example.com").await;
    let poem = create_poem(&app.server, &a, "P").await;

    let first = read(&app, &b.token, poem).await;
    assert!(first.recorded);
    assert_eq!((first.read_count, first.author_popularity), (1, 1));
    assert_eq!(first.message, "+1 to the author's popularity!");

    let again = read(&app, &b.token, poem).await;
    assert!(!again.recorded);
    assert_eq!(again.message, "Already read");
    assert_eq!((again.read_count, again.author_popularity), (1, 1));

    let third = read(&app, &c.token, poem).await;
    assert_eq!((third.read_count, third.author_popularity), (2, 2));
    assert_eq!(popularity(&app, a.id).await, 2);

    let response = app
        .server
        .delete(&format!("/api/poems/{poem}"))
        .authorization_bearer(&a.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: DeletedResponse = response.json();
    assert_eq!(body.message, "Poem deleted");

    assert_eq!(popularity(&app, a.id).await, 0);
    let response = app.server.get(&format!("/api/poems/{poem}")).await;
    crate::assert_error_response!(response, StatusCode::NOT_FOUND, "Poem not found");
    let listed: Vec<PoemView> = app.server.get("/api/poems").await.json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_delete_releases_only_that_poem() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;
    let kept = create_poem(&app.server, &author, "Kept").await;
    let doomed = create_poem(&app.server, &author, "Doomed").await;

    for _ in 0..3 {
        let reader = register_unique_user(&app.server, "Reader").await;
        read(&app, &reader.token, doomed).await;
        read(&app, &reader.token, kept).await;
    }
    let reader = register_unique_user(&app.server, "Reader").await;
    read(&app, &reader.token, kept).await;
    assert_eq!(popularity(&app, author.id).await, 7);

    app.server
        .delete(&format!("/api/poems/{doomed}"))
        .authorization_bearer(&author.token)
        .await
        .assert_status_ok();

    assert_eq!(popularity(&app, author.id).await, 4);
    let kept = app.store.get_poem(kept).await.unwrap().unwrap();
    assert_eq!(kept.read_count, 4);
}

#[tokio::test]
async fn test_author_reading_own_poem_counts() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;
    let poem = create_poem(&app.server, &author, "Mirror").await;

    let receipt = read(&app, &author.token, poem).await;
    assert!(receipt.recorded);
    assert_eq!(popularity(&app, author.id).await, 1);
}

#[tokio::test]
async fn test_read_requires_authentication() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;
    let poem = create_poem(&app.server, &author, "Closed").await;

    let response = app.server.post(&format!("/api/poems/{poem}/read")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(popularity(&app, author.id).await, 0);
}

#[tokio::test]
async fn test_read_unknown_or_malformed_poem() {
    let app = test_app();
    let reader = register_unique_user(&app.server, "Reader").await;

    let response = app
        .server
        .post(&format!("/api/poems/{}/read", Uuid::new_v4()))
        .authorization_bearer(&reader.token)
        .await;
    crate::assert_error_response!(response, StatusCode::NOT_FOUND, "Poem not found");

    let response = app
        .server
        .post("/api/poems/not-an-id/read")
        .authorization_bearer(&reader.token)
        .await;
    crate::assert_error_response!(response, StatusCode::NOT_FOUND, "Poem not found");
}

#[tokio::test]
async fn test_read_of_orphaned_poem_is_server_error() {
    let app = test_app();
    let reader = register_unique_user(&app.server, "Reader").await;
    let orphan = app
        .store
        .create_poem(NewPoem {
            title: "Orphan".to_string(),
            content: "No one wrote me".to_string(),
            author_id: Uuid::new_v4(),
            author_name: "Ghost".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .server
        .post(&format!("/api/poems/{}/read", orphan.id))
        .authorization_bearer(&reader.token)
        .await;
    crate::assert_error_response!(response, StatusCode::INTERNAL_SERVER_ERROR, "Server error");

    let stored = app.store.get_poem(orphan.id).await.unwrap().unwrap();
    assert_eq!(stored.read_count, 0);
    assert!(stored.distinct_readers.is_empty());
}

#[tokio::test]
async fn test_create_poem() {
    let app = test_app();
    let author = register_user(&app.server, "Anna", "anna@example.com").await;

    let response = app
        .server
        .post("/api/poems")
        .authorization_bearer(&author.token)
        .json(&json!({ "title": "  Requiem ", "content": "No, not under\nthe vault" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let poem: PoemView = response.json();
    assert_eq!(poem.title, "Requiem");
    assert_eq!(poem.content, "No, not under\nthe vault");
    assert_eq!(poem.author_id, author.id);
    assert_eq!(poem.author_name, "Anna");
    assert_eq!(poem.read_count, 0);
    assert!(poem.distinct_readers.is_empty());
    let card = poem.author.expect("author card embedded");
    assert_eq!(card.id, author.id);
    assert_eq!(card.popularity, 0);
}

#[tokio::test]
async fn test_create_poem_validation_and_auth() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;

    let response = app
        .server
        .post("/api/poems")
        .json(&json!({ "title": "T", "content": "C" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/poems")
        .authorization_bearer(&author.token)
        .json(&json!({ "title": "   ", "content": "C" }))
        .await;
    crate::assert_error_response!(response, StatusCode::BAD_REQUEST, "title is required");

    let response = app
        .server
        .post("/api/poems")
        .authorization_bearer(&author.token)
        .json(&json!({ "title": "T" }))
        .await;
    crate::assert_error_response!(response, StatusCode::BAD_REQUEST, "content is required");

    assert!(app.store.list_poems(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_by_owner() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;
    let poem = create_poem(&app.server, &author, "Draft").await;
    let before = app.store.get_poem(poem).await.unwrap().unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = app
        .server
        .put(&format!("/api/poems/{poem}"))
        .authorization_bearer(&author.token)
        .json(&json!({ "title": "Final", "content": "Polished" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: PoemView = response.json();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "Polished");
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_only_author_may_modify() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;
    let other = register_unique_user(&app.server, "Other").await;
    let poem = create_poem(&app.server, &author, "Mine").await;
    read(&app, &other.token, poem).await;

    let response = app
        .server
        .put(&format!("/api/poems/{poem}"))
        .authorization_bearer(&other.token)
        .json(&json!({ "title": "Stolen", "content": "Stolen" }))
        .await;
    crate::assert_error_response!(
        response,
        StatusCode::UNAUTHORIZED,
        "You cannot edit someone else's poem"
    );

    let response = app
        .server
        .delete(&format!("/api/poems/{poem}"))
        .authorization_bearer(&other.token)
        .await;
    crate::assert_error_response!(
        response,
        StatusCode::UNAUTHORIZED,
        "You cannot delete someone else's poem"
    );

    let stored = app.store.get_poem(poem).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mine");
    assert_eq!(stored.read_count, 1);
    assert_eq!(popularity(&app, author.id).await, 1);
}

#[tokio::test]
async fn test_modify_unknown_poem() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;

    let response = app
        .server
        .put(&format!("/api/poems/{}", Uuid::new_v4()))
        .authorization_bearer(&author.token)
        .json(&json!({ "title": "T", "content": "C" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .delete("/api/poems/12345")
        .authorization_bearer(&author.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_newest_first_with_authors() {
    let app = test_app();
    let anna = register_user(&app.server, "Anna", "anna@example.com").await;
    let boris = register_user(&app.server, "Boris", "boris@example.com").await;

    let first = create_poem(&app.server, &anna, "First").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_poem(&app.server, &boris, "Second").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let third = create_poem(&app.server, &anna, "Third").await;
    read(&app, &boris.token, first).await;

    let all: Vec<PoemView> = app.server.get("/api/poems").await.json();
    let ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![third, second, first]);
    let first_view = all.iter().find(|p| p.id == first).unwrap();
    assert_eq!(first_view.author.as_ref().unwrap().popularity, 1);
    assert_eq!(first_view.distinct_readers, vec![boris.id]);

    let annas: Vec<PoemView> = app
        .server
        .get(&format!("/api/poems/user/{}", anna.id))
        .await
        .json();
    let ids: Vec<Uuid> = annas.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![third, first]);

    let nobody: Vec<PoemView> = app
        .server
        .get(&format!("/api/poems/user/{}", Uuid::new_v4()))
        .await
        .json();
    assert!(nobody.is_empty());

    let single: PoemView = app.server.get(&format!("/api/poems/{second}")).await.json();
    assert_eq!(single.title, "Second");
    assert_eq!(single.author.unwrap().name, "Boris");
}

#[tokio::test]
async fn test_concurrent_reads_lose_nothing() {
    let app = test_app();
    let author = register_unique_user(&app.server, "Author").await;
    let poem = create_poem(&app.server, &author, "Popular").await;

    let mut readers = Vec::new();
    for _ in 0..16 {
        readers.push(register_unique_user(&app.server, "Reader").await);
    }

    let reads = readers.iter().chain(readers.iter()).map(|reader| {
        let ledger = app.state.ledger.clone();
        let reader = reader.id;
        async move { ledger.on_poem_read(poem, reader).await }
    });
    let results = spawn_all(reads).await;
    assert!(results.iter().all(Result::is_ok));

    let stored = app.store.get_poem(poem).await.unwrap().unwrap();
    assert_eq!(stored.read_count, 16);
    assert_eq!(popularity(&app, author.id).await, 16);
}

async fn spawn_all<F, T>(futures: impl IntoIterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.expect("task completed"));
    }
    results
}
