//! PostgreSQL store tests
//!
//! The ledger transitions, ordering and uniqueness rules against a real
//! database.

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use stanza::backend::ledger::ReadStatus;
use stanza::backend::store::{
    ContentStore, IdentityStore, LedgerStore, NewPoem, Poem, PostgresStore, StoreError, User,
    UserListQuery,
};
use uuid::Uuid;

use crate::common::{unique_user, TestDatabase};

async fn poem_by(store: &PostgresStore, author: &User, title: &str) -> Poem {
    store
        .create_poem(NewPoem {
            title: title.to_string(),
            content: "Line one\nLine two".to_string(),
            author_id: author.id,
            author_name: author.name.clone(),
        })
        .await
        .unwrap()
}

async fn popularity(store: &PostgresStore, user: Uuid) -> i64 {
    store.find_user_by_id(user).await.unwrap().unwrap().popularity
}

#[tokio::test]
async fn test_read_and_delete_scenario() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = &db.store;
    let a = store.create_user(unique_user("A")).await.unwrap();
    let b = store.create_user(unique_user("B")).await.unwrap();
    let c = store.create_user(unique_user("C")).await.unwrap();
    let poem = poem_by(store, &a, "P").await;
    assert_eq!(poem.read_count, 0);

    let first = store.record_read(poem.id, b.id).await.unwrap();
    assert_eq!(first.status, ReadStatus::Recorded);
    assert_eq!((first.read_count, first.author_popularity), (1, 1));

    let again = store.record_read(poem.id, b.id).await.unwrap();
    assert_eq!(again.status, ReadStatus::AlreadyRecorded);
    assert_eq!((again.read_count, again.author_popularity), (1, 1));

    let third = store.record_read(poem.id, c.id).await.unwrap();
    assert_eq!((third.read_count, third.author_popularity), (2, 2));

    let stored = store.get_poem(poem.id).await.unwrap().unwrap();
    assert_eq!(stored.read_count, 2);
    assert!(stored.distinct_readers.contains(&b.id));
    assert!(stored.distinct_readers.contains(&c.id));

    let deletion = store.remove_poem_and_release(poem.id).await.unwrap();
    assert_eq!(deletion.released, 2);
    assert_eq!(deletion.author_popularity, 0);
    assert!(!deletion.clamped);
    assert_eq!(popularity(store, a.id).await, 0);
    assert!(store.get_poem(poem.id).await.unwrap().is_none());
    assert!(store.list_poems(Some(a.id)).await.unwrap().is_empty());

    assert_matches!(
        store.record_read(poem.id, b.id).await,
        Err(StoreError::PoemNotFound(id)) if id == poem.id
    );
    assert_matches!(
        store.remove_poem_and_release(poem.id).await,
        Err(StoreError::PoemNotFound(_))
    );
}

#[tokio::test]
async fn test_delete_releases_only_that_poem() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = &db.store;
    let author = store.create_user(unique_user("Author")).await.unwrap();
    let kept = poem_by(store, &author, "Kept").await;
    let dropped = poem_by(store, &author, "Dropped").await;

    for _ in 0..3 {
        store.record_read(dropped.id, Uuid::new_v4()).await.unwrap();
    }
    store.record_read(kept.id, Uuid::new_v4()).await.unwrap();
    assert_eq!(popularity(store, author.id).await, 4);

    let deletion = store.remove_poem_and_release(dropped.id).await.unwrap();
    assert_eq!(deletion.released, 3);
    assert_eq!(deletion.author_popularity, 1);
    assert_eq!(store.count_poems_by_author(author.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_reads_count_each_reader_once() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = Arc::new(db.store.clone());
    let author = store.create_user(unique_user("Popular")).await.unwrap();
    let poem = poem_by(&store, &author, "Crowd").await;
    let poem_id = poem.id;

    let readers: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();
    let handles: Vec<_> = readers
        .iter()
        .chain(readers.iter())
        .map(|&reader| {
            let store = store.clone();
            tokio::spawn(async move { store.record_read(poem_id, reader).await })
        })
        .collect();

    let mut recorded = 0;
    let mut repeated = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap().status {
            ReadStatus::Recorded => recorded += 1,
            ReadStatus::AlreadyRecorded => repeated += 1,
        }
    }
    assert_eq!((recorded, repeated), (20, 20));

    let stored = store.get_poem(poem.id).await.unwrap().unwrap();
    assert_eq!(stored.read_count, 20);
    assert_eq!(stored.distinct_readers.len(), 20);
    assert_eq!(popularity(&store, author.id).await, 20);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let user = unique_user("Twin");
    db.store.create_user(user.clone()).await.unwrap();

    assert_matches!(
        db.store.create_user(user.clone()).await,
        Err(StoreError::DuplicateEmail)
    );
    let found = db.store.find_user_by_email(&user.email).await.unwrap();
    assert_eq!(found.map(|u| u.name), Some("Twin".to_string()));
}

#[tokio::test]
async fn test_list_users_filter_and_order() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = &db.store;
    let read = store.create_user(unique_user("Read")).await.unwrap();
    let unread = store.create_user(unique_user("Unread")).await.unwrap();
    let poem = poem_by(store, &read, "Seen").await;
    store.record_read(poem.id, unread.id).await.unwrap();

    let everyone = store.list_users(UserListQuery::all()).await.unwrap();
    let ids: Vec<Uuid> = everyone.iter().map(|u| u.id).collect();
    assert!(ids.contains(&read.id));
    assert!(ids.contains(&unread.id));
    assert!(everyone
        .windows(2)
        .all(|w| w[0].popularity >= w[1].popularity));

    let top = store
        .list_users(UserListQuery::top_authors(i64::from(i32::MAX)))
        .await
        .unwrap();
    assert!(top.iter().all(|u| u.popularity > 0));
    assert!(top.iter().any(|u| u.id == read.id));
    assert!(!top.iter().any(|u| u.id == unread.id));

    let one = store.list_users(UserListQuery::top_authors(1)).await.unwrap();
    assert_eq!(one.len(), 1);
}

#[tokio::test]
async fn test_popularity_delta_floors_at_zero() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let user = db.store.create_user(unique_user("Drift")).await.unwrap();

    let raised = db.store.apply_popularity_delta(user.id, 4).await.unwrap();
    assert_eq!(raised.map(|u| u.popularity), Some(4));
    let floored = db.store.apply_popularity_delta(user.id, -10).await.unwrap();
    assert_eq!(floored.map(|u| u.popularity), Some(0));
    assert!(db
        .store
        .apply_popularity_delta(Uuid::new_v4(), 1)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_and_list_poems() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = &db.store;
    let author = store.create_user(unique_user("Editor")).await.unwrap();
    let first = poem_by(store, &author, "First").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = poem_by(store, &author, "Second").await;

    let updated = store
        .update_poem(first.id, "First, revised", "New words")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "First, revised");
    assert!(updated.updated_at > first.updated_at);
    assert_eq!(updated.created_at, first.created_at);
    assert!(store
        .update_poem(Uuid::new_v4(), "t", "c")
        .await
        .unwrap()
        .is_none());

    let ids: Vec<Uuid> = store
        .list_poems(Some(author.id))
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert!(store.delete_poem(second.id).await.unwrap());
    assert!(!store.delete_poem(second.id).await.unwrap());
}
