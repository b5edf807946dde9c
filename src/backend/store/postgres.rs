/**
 * PostgreSQL Store
 *
 * sqlx-backed store. The schema lives in `migrations/` and is applied on
 * connect.
 *
 * Ledger transitions run in one transaction each:
 *
 * - **Read**: a conditional `array_append` adds the reader only when absent,
 *   so two concurrent reads by the same reader cannot both succeed. The
 *   author update follows in the same transaction; if the author row is
 *   gone the transaction is rolled back.
 * - **Delete**: the poem and then its author are locked `FOR UPDATE`, the
 *   release is computed, the author updated and the poem removed.
 */

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::ledger::{self, Deletion, ReadReceipt, ReadStatus};
use crate::backend::store::{
    ContentStore, IdentityStore, LedgerStore, NewPoem, NewUser, Poem, Store, StoreError, User,
    UserListQuery,
};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, birthdate, bio, avatar_color, popularity, registered_at";

const POEM_COLUMNS: &str =
    "id, title, content, author_id, author_name, read_count, distinct_readers, created_at, updated_at";

/// Poem row as sqlx decodes it
#[derive(Debug, sqlx::FromRow)]
struct PoemRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    author_name: String,
    read_count: i64,
    distinct_readers: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PoemRow> for Poem {
    fn from(row: PoemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            author_name: row.author_name,
            read_count: row.read_count,
            distinct_readers: row.distinct_readers.into_iter().collect::<BTreeSet<_>>(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool. Migrations are not run.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and apply pending migrations.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    /// * `max_connections` - Pool size
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                e
            })?;
        tracing::info!("Database connection established");

        sqlx::migrate!().run(&pool).await.map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            StoreError::Database(e.into())
        })?;
        tracing::info!("Migrations completed successfully");

        Ok(Self::new(pool))
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl IdentityStore for PostgresStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = user.into_user();

        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users ({USER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.birthdate)
        .bind(&user.bio)
        .bind(&user.avatar_color)
        .bind(user.popularity)
        .bind(user.registered_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn apply_popularity_delta(
        &self,
        id: Uuid,
        delta: i64,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET popularity = GREATEST(popularity + $2, 0)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::BIGINT IS NULL OR popularity > $1)
            ORDER BY popularity DESC, registered_at ASC
            LIMIT $2
            "#
        ))
        .bind(query.popularity_above)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl ContentStore for PostgresStore {
    async fn create_poem(&self, poem: NewPoem) -> Result<Poem, StoreError> {
        let poem = poem.into_poem();
        let readers: Vec<Uuid> = poem.distinct_readers.iter().copied().collect();

        let row = sqlx::query_as::<_, PoemRow>(&format!(
            r#"
            INSERT INTO poems ({POEM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {POEM_COLUMNS}
            "#
        ))
        .bind(poem.id)
        .bind(&poem.title)
        .bind(&poem.content)
        .bind(poem.author_id)
        .bind(&poem.author_name)
        .bind(poem.read_count)
        .bind(&readers)
        .bind(poem.created_at)
        .bind(poem.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_poem(&self, id: Uuid) -> Result<Option<Poem>, StoreError> {
        let row = sqlx::query_as::<_, PoemRow>(&format!(
            "SELECT {POEM_COLUMNS} FROM poems WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Poem::from))
    }

    async fn update_poem(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Poem>, StoreError> {
        let row = sqlx::query_as::<_, PoemRow>(&format!(
            r#"
            UPDATE poems SET title = $2, content = $3, updated_at = $4
            WHERE id = $1
            RETURNING {POEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Poem::from))
    }

    async fn delete_poem(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM poems WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_poems(&self, author: Option<Uuid>) -> Result<Vec<Poem>, StoreError> {
        let rows = sqlx::query_as::<_, PoemRow>(&format!(
            r#"
            SELECT {POEM_COLUMNS} FROM poems
            WHERE ($1::UUID IS NULL OR author_id = $1)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Poem::from).collect())
    }

    async fn count_poems_by_author(&self, author: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM poems WHERE author_id = $1")
            .bind(author)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl LedgerStore for PostgresStore {
    async fn record_read(
        &self,
        poem_id: Uuid,
        reader_id: Uuid,
    ) -> Result<ReadReceipt, StoreError> {
        let mut tx = self.pool.begin().await?;

        let appended: Option<(Uuid, i64)> = sqlx::query_as(
            r#"
            UPDATE poems
            SET distinct_readers = array_append(distinct_readers, $2),
                read_count = read_count + 1
            WHERE id = $1 AND NOT ($2 = ANY(distinct_readers))
            RETURNING author_id, read_count
            "#,
        )
        .bind(poem_id)
        .bind(reader_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((author_id, read_count)) = appended else {
            // Either the poem is gone or this reader is already counted.
            let existing: Option<(Uuid, i64)> =
                sqlx::query_as("SELECT author_id, read_count FROM poems WHERE id = $1")
                    .bind(poem_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let (author_id, read_count) = existing.ok_or(StoreError::PoemNotFound(poem_id))?;

            let popularity: Option<i64> =
                sqlx::query_scalar("SELECT popularity FROM users WHERE id = $1")
                    .bind(author_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let author_popularity = popularity.ok_or(StoreError::MissingAuthor(author_id))?;
            tx.commit().await?;

            return Ok(ReadReceipt {
                status: ReadStatus::AlreadyRecorded,
                read_count,
                author_popularity,
            });
        };

        let popularity: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET popularity = popularity + 1 WHERE id = $1 RETURNING popularity",
        )
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls the reader append back.
        let author_popularity = popularity.ok_or(StoreError::MissingAuthor(author_id))?;
        tx.commit().await?;

        Ok(ReadReceipt {
            status: ReadStatus::Recorded,
            read_count,
            author_popularity,
        })
    }

    async fn remove_poem_and_release(&self, poem_id: Uuid) -> Result<Deletion, StoreError> {
        let mut tx = self.pool.begin().await?;

        let poem: Option<(Uuid, i64)> =
            sqlx::query_as("SELECT author_id, read_count FROM poems WHERE id = $1 FOR UPDATE")
                .bind(poem_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (author_id, released) = poem.ok_or(StoreError::PoemNotFound(poem_id))?;

        let popularity: Option<i64> =
            sqlx::query_scalar("SELECT popularity FROM users WHERE id = $1 FOR UPDATE")
                .bind(author_id)
                .fetch_optional(&mut *tx)
                .await?;
        let popularity = popularity.ok_or(StoreError::MissingAuthor(author_id))?;

        let (author_popularity, clamped) = ledger::release_popularity(popularity, released);

        sqlx::query("UPDATE users SET popularity = $2 WHERE id = $1")
            .bind(author_id)
            .bind(author_popularity)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM poems WHERE id = $1")
            .bind(poem_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Deletion {
            poem_id,
            author_id,
            released,
            author_popularity,
            clamped,
        })
    }
}

impl Store for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
