//! Database migration tests
//!
//! The schema applies cleanly and its CHECK constraints back the ledger
//! counters.

use stanza::backend::store::{ContentStore, IdentityStore, NewPoem, PostgresStore};
use uuid::Uuid;

use crate::common::{database_url, unique_user, TestDatabase};

#[tokio::test]
async fn test_connect_runs_migrations() {
    let Some(url) = database_url() else {
        return;
    };

    let store = PostgresStore::connect(&url, 2).await;
    assert!(store.is_ok(), "Connect should migrate and succeed");
    // Running them again is a no-op.
    let store = PostgresStore::connect(&url, 2).await;
    assert!(store.is_ok(), "Migrations should be idempotent");
}

#[tokio::test]
async fn test_tables_exist() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    for table in ["users", "poems"] {
        let result = sqlx::query(&format!("SELECT 1 FROM {table} LIMIT 1"))
            .execute(db.pool())
            .await;
        assert!(result.is_ok(), "{table} table should exist");
    }
}

#[tokio::test]
async fn test_popularity_cannot_go_negative() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let user = db.store.create_user(unique_user("Floor")).await.unwrap();

    let result = sqlx::query("UPDATE users SET popularity = -1 WHERE id = $1")
        .bind(user.id)
        .execute(db.pool())
        .await;
    assert!(result.is_err(), "popularity >= 0 should be enforced");
}

#[tokio::test]
async fn test_read_count_must_match_readers() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let author = db.store.create_user(unique_user("Counter")).await.unwrap();
    let poem = db
        .store
        .create_poem(NewPoem {
            title: "Tally".to_string(),
            content: "one two three".to_string(),
            author_id: author.id,
            author_name: author.name.clone(),
        })
        .await
        .unwrap();

    let result = sqlx::query("UPDATE poems SET read_count = 3 WHERE id = $1")
        .bind(poem.id)
        .execute(db.pool())
        .await;
    assert!(result.is_err(), "read_count should track distinct_readers");

    let result = sqlx::query(
        "UPDATE poems SET distinct_readers = ARRAY[$2]::UUID[], read_count = 1 WHERE id = $1",
    )
    .bind(poem.id)
    .bind(Uuid::new_v4())
    .execute(db.pool())
    .await;
    assert!(result.is_ok(), "a consistent update is accepted");
}

#[tokio::test]
async fn test_poem_requires_existing_author() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    let result = db
        .store
        .create_poem(NewPoem {
            title: "Orphan".to_string(),
            content: "No one wrote me".to_string(),
            author_id: Uuid::new_v4(),
            author_name: "Ghost".to_string(),
        })
        .await;
    assert!(result.is_err(), "author_id should reference users");
}
