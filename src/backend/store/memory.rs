/**
 * In-Memory Store
 *
 * Users and poems in two maps behind one `tokio::sync::RwLock`. Every ledger
 * transition runs under a single write guard, which makes it atomic for any
 * other reader or writer of the store.
 *
 * Used by the test suites and as the fallback when no `DATABASE_URL` is set.
 * Nothing is persisted across restarts.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::ledger::{self, Deletion, ReadReceipt};
use crate::backend::store::{
    ContentStore, IdentityStore, LedgerStore, NewPoem, NewUser, Poem, Store, StoreError, User,
    UserListQuery,
};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    poems: HashMap<Uuid, Poem>,
}

/// Store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn limit_len(limit: Option<i64>) -> usize {
    limit
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or(usize::MAX)
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut guard = self.inner.write().await;
        if guard.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let user = user.into_user();
        guard.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn apply_popularity_delta(
        &self,
        id: Uuid,
        delta: i64,
    ) -> Result<Option<User>, StoreError> {
        let mut guard = self.inner.write().await;
        let Some(user) = guard.users.get_mut(&id) else {
            return Ok(None);
        };

        let (popularity, _) = ledger::shift_popularity(user.popularity, delta);
        user.popularity = popularity;
        Ok(Some(user.clone()))
    }

    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>, StoreError> {
        let guard = self.inner.read().await;
        let mut users: Vec<User> = guard
            .users
            .values()
            .filter(|u| query.admits(u))
            .cloned()
            .collect();

        users.sort_by(|a, b| {
            b.popularity
                .cmp(&a.popularity)
                .then(a.registered_at.cmp(&b.registered_at))
        });
        users.truncate(limit_len(query.limit));
        Ok(users)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_poem(&self, poem: NewPoem) -> Result<Poem, StoreError> {
        let poem = poem.into_poem();
        self.inner.write().await.poems.insert(poem.id, poem.clone());
        Ok(poem)
    }

    async fn get_poem(&self, id: Uuid) -> Result<Option<Poem>, StoreError> {
        Ok(self.inner.read().await.poems.get(&id).cloned())
    }

    async fn update_poem(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Poem>, StoreError> {
        let mut guard = self.inner.write().await;
        let Some(poem) = guard.poems.get_mut(&id) else {
            return Ok(None);
        };

        poem.title = title.to_string();
        poem.content = content.to_string();
        poem.updated_at = Utc::now();
        Ok(Some(poem.clone()))
    }

    async fn delete_poem(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.poems.remove(&id).is_some())
    }

    async fn list_poems(&self, author: Option<Uuid>) -> Result<Vec<Poem>, StoreError> {
        let guard = self.inner.read().await;
        let mut poems: Vec<Poem> = guard
            .poems
            .values()
            .filter(|p| author.map_or(true, |a| p.author_id == a))
            .cloned()
            .collect();

        poems.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(poems)
    }

    async fn count_poems_by_author(&self, author: Uuid) -> Result<i64, StoreError> {
        let guard = self.inner.read().await;
        let count = guard.poems.values().filter(|p| p.author_id == author).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn record_read(
        &self,
        poem_id: Uuid,
        reader_id: Uuid,
    ) -> Result<ReadReceipt, StoreError> {
        let mut guard = self.inner.write().await;
        let Collections { users, poems } = &mut *guard;

        let poem = poems
            .get_mut(&poem_id)
            .ok_or(StoreError::PoemNotFound(poem_id))?;
        // Resolve the author before touching the poem so a failure leaves
        // both records as they were.
        let author = users
            .get_mut(&poem.author_id)
            .ok_or(StoreError::MissingAuthor(poem.author_id))?;

        Ok(ledger::apply_read(poem, author, reader_id))
    }

    async fn remove_poem_and_release(&self, poem_id: Uuid) -> Result<Deletion, StoreError> {
        let mut guard = self.inner.write().await;
        let Collections { users, poems } = &mut *guard;

        let poem = poems.get(&poem_id).ok_or(StoreError::PoemNotFound(poem_id))?;
        let author = users
            .get_mut(&poem.author_id)
            .ok_or(StoreError::MissingAuthor(poem.author_id))?;

        let released = poem.read_count;
        let (popularity, clamped) = ledger::release_popularity(author.popularity, released);
        author.popularity = popularity;
        let author_id = author.id;
        poems.remove(&poem_id);

        Ok(Deletion {
            poem_id,
            author_id,
            released,
            author_popularity: popularity,
            clamped,
        })
    }
}

impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
