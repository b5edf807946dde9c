/**
 * Popularity Ledger
 *
 * Keeps every user's `popularity` equal to the number of distinct readers
 * across that user's poems, without ever recomputing it in normal operation.
 *
 * # Transitions
 *
 * - **Created**: a poem starts with no readers and no popularity effect.
 * - **Read**: a reader not yet in the poem's set is added, the poem's read
 *   count and the author's popularity both go up by one. A repeat read is a
 *   no-op.
 * - **Deleted**: the author's popularity drops by the poem's read count as
 *   of the moment of deletion, then the poem is removed.
 *
 * The read and delete transitions touch two records. Stores run each one
 * atomically (`LedgerStore`); the arithmetic they apply lives here so both
 * backends agree on it.
 *
 * # Policies
 *
 * - An unresolved author fails the whole transition. Nothing is applied.
 * - Popularity never goes below zero. A release that would push it negative
 *   is clamped and logged as drift for `reconcile` to repair.
 * - Authors may read their own poems; such reads count like any other.
 */

use uuid::Uuid;

use crate::backend::store::{NewPoem, Poem, SharedStore, StoreError, User, UserListQuery};
use crate::shared::poem::ValidDraft;

/// Whether a read changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// First read by this reader: counters moved
    Recorded,
    /// Reader was already counted: nothing changed
    AlreadyRecorded,
}

/// Result of a read transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadReceipt {
    pub status: ReadStatus,
    /// Poem read count after the transition
    pub read_count: i64,
    /// Author popularity after the transition
    pub author_popularity: i64,
}

/// Result of a delete transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    pub poem_id: Uuid,
    pub author_id: Uuid,
    /// Read count of the poem at deletion time
    pub released: i64,
    /// Author popularity after the release
    pub author_popularity: i64,
    /// Whether the release hit the zero floor
    pub clamped: bool,
}

/// Outcome of [`PopularityLedger::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub user_id: Uuid,
    /// Popularity stored before reconciling
    pub recorded: i64,
    /// Sum of read counts over the user's poems
    pub derived: i64,
}

impl Reconciliation {
    /// Whether the stored counter had drifted.
    pub fn corrected(&self) -> bool {
        self.recorded != self.derived
    }
}

/// Apply a read to a poem and its author, both already locked by the caller.
///
/// Returns the receipt; on a repeat read neither record is modified.
pub fn apply_read(poem: &mut Poem, author: &mut User, reader_id: Uuid) -> ReadReceipt {
    debug_assert_eq!(poem.author_id, author.id);

    if !poem.distinct_readers.insert(reader_id) {
        return ReadReceipt {
            status: ReadStatus::AlreadyRecorded,
            read_count: poem.read_count,
            author_popularity: author.popularity,
        };
    }

    poem.read_count += 1;
    author.popularity += 1;

    ReadReceipt {
        status: ReadStatus::Recorded,
        read_count: poem.read_count,
        author_popularity: author.popularity,
    }
}

/// Popularity after adding `delta`, floored at zero.
///
/// The second value reports whether the floor was hit.
pub fn shift_popularity(popularity: i64, delta: i64) -> (i64, bool) {
    let next = popularity.saturating_add(delta);
    if next < 0 {
        (0, true)
    } else {
        (next, false)
    }
}

/// Popularity after releasing a deleted poem's readers.
pub fn release_popularity(popularity: i64, read_count: i64) -> (i64, bool) {
    shift_popularity(popularity, -read_count)
}

/// Ledger facade used by the poem handlers.
#[derive(Clone)]
pub struct PopularityLedger {
    store: SharedStore,
}

impl PopularityLedger {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a poem owned by `author`.
    ///
    /// The author's current name is snapshotted onto the poem.
    pub async fn on_poem_created(&self, author: &User, draft: ValidDraft) -> Result<Poem, StoreError> {
        let poem = self
            .store
            .create_poem(NewPoem {
                title: draft.title,
                content: draft.content,
                author_id: author.id,
                author_name: author.name.clone(),
            })
            .await?;

        tracing::info!("Poem {} created by {}", poem.id, author.id);
        Ok(poem)
    }

    /// Count `reader_id` as a reader of the poem, at most once.
    pub async fn on_poem_read(&self, poem_id: Uuid, reader_id: Uuid) -> Result<ReadReceipt, StoreError> {
        let receipt = self.store.record_read(poem_id, reader_id).await.map_err(|e| {
            if let StoreError::MissingAuthor(author) = &e {
                tracing::error!(
                    "Read of poem {} by {} abandoned: author {} is missing",
                    poem_id,
                    reader_id,
                    author
                );
            }
            e
        })?;

        match receipt.status {
            ReadStatus::Recorded => tracing::info!(
                "Reader {} counted on poem {} (reads: {}, author popularity: {})",
                reader_id,
                poem_id,
                receipt.read_count,
                receipt.author_popularity
            ),
            ReadStatus::AlreadyRecorded => {
                tracing::debug!("Reader {} already counted on poem {}", reader_id, poem_id)
            }
        }

        Ok(receipt)
    }

    /// Delete a poem and release its readers from the author's popularity.
    pub async fn on_poem_deleted(&self, poem: &Poem) -> Result<Deletion, StoreError> {
        let deletion = self.store.remove_poem_and_release(poem.id).await?;

        if deletion.clamped {
            tracing::warn!(
                "Popularity of {} clamped at zero while releasing {} readers of poem {}; run `stanza-server reconcile`",
                deletion.author_id,
                deletion.released,
                deletion.poem_id
            );
        }
        tracing::info!(
            "Poem {} deleted, {} readers released from {}",
            deletion.poem_id,
            deletion.released,
            deletion.author_id
        );

        Ok(deletion)
    }

    /// Recompute a user's popularity from their poems and store it if it
    /// drifted.
    ///
    /// This is a maintenance operation. It reads and writes in separate
    /// steps, so it should run while no reads of the user's poems are in
    /// flight. Returns `None` for an unknown user.
    pub async fn reconcile(&self, user_id: Uuid) -> Result<Option<Reconciliation>, StoreError> {
        let Some(user) = self.store.find_user_by_id(user_id).await? else {
            return Ok(None);
        };

        let derived = self
            .store
            .list_poems(Some(user_id))
            .await?
            .iter()
            .map(|poem| poem.read_count)
            .sum();

        let reconciliation = Reconciliation {
            user_id,
            recorded: user.popularity,
            derived,
        };

        if reconciliation.corrected() {
            tracing::warn!(
                "Popularity of {} drifted: recorded {}, derived {}",
                user_id,
                reconciliation.recorded,
                reconciliation.derived
            );
            self.store
                .apply_popularity_delta(user_id, derived - user.popularity)
                .await?;
        }

        Ok(Some(reconciliation))
    }

    /// Reconcile every user, returning the reports of those that drifted.
    pub async fn reconcile_all(&self) -> Result<Vec<Reconciliation>, StoreError> {
        let users = self.store.list_users(UserListQuery::all()).await?;
        let checked = users.len();

        let mut drifted = Vec::new();
        for user in users {
            if let Some(report) = self.reconcile(user.id).await? {
                if report.corrected() {
                    drifted.push(report);
                }
            }
        }

        tracing::info!("Reconciled {} users, {} corrected", checked, drifted.len());
        Ok(drifted)
    }
}
