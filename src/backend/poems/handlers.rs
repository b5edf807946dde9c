/**
 * Poem Handlers
 *
 * HTTP handlers for `/api/poems`. Reads, creations and deletions go through
 * the popularity ledger; listing and editing go straight to the store.
 *
 * Every poem in a response carries a live author card (name, color,
 * popularity) next to the `author_name` snapshot taken at creation.
 */

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::{parse_id, BackendError};
use crate::backend::ledger::{PopularityLedger, ReadStatus};
use crate::backend::middleware::{ensure_owner, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::store::{Poem, SharedStore};
use crate::shared::{AuthorSummary, PoemDraft, PoemView, ReadResponse};

pub const POEM_NOT_FOUND: &str = "Poem not found";
pub const READ_RECORDED: &str = "+1 to the author's popularity!";
pub const ALREADY_READ: &str = "Already read";

/// Body of `DELETE /api/poems/:id`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeletedResponse {
    pub message: String,
}

/// Attach author cards to poems, looking each author up once.
async fn with_authors(store: &SharedStore, poems: Vec<Poem>) -> Result<Vec<PoemView>, BackendError> {
    let mut authors: HashMap<Uuid, Option<AuthorSummary>> = HashMap::new();
    let mut views = Vec::with_capacity(poems.len());

    for poem in poems {
        if !authors.contains_key(&poem.author_id) {
            let author = store
                .find_user_by_id(poem.author_id)
                .await?
                .map(|user| AuthorSummary::from(&user));
            if author.is_none() {
                tracing::warn!("Poem {} references missing author {}", poem.id, poem.author_id);
            }
            authors.insert(poem.author_id, author);
        }
        let author = authors.get(&poem.author_id).cloned().flatten();
        views.push(poem.view(author));
    }

    Ok(views)
}

async fn with_author(store: &SharedStore, poem: Poem) -> Result<PoemView, BackendError> {
    let author = store
        .find_user_by_id(poem.author_id)
        .await?
        .map(|user| AuthorSummary::from(&user));
    Ok(poem.view(author))
}

async fn load_poem(store: &SharedStore, raw_id: &str) -> Result<Poem, BackendError> {
    let id = parse_id(raw_id, "Poem")?;
    store
        .get_poem(id)
        .await?
        .ok_or_else(|| BackendError::not_found(POEM_NOT_FOUND))
}

/// GET /api/poems
///
/// All poems, newest first.
pub async fn list_poems(State(store): State<SharedStore>) -> Result<Json<Vec<PoemView>>, BackendError> {
    let poems = store.list_poems(None).await?;
    tracing::debug!("Listing {} poems", poems.len());
    Ok(Json(with_authors(&store, poems).await?))
}

/// GET /api/poems/:id
pub async fn get_poem(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<PoemView>, BackendError> {
    let poem = load_poem(&store, &id).await?;
    Ok(Json(with_author(&store, poem).await?))
}

/// POST /api/poems
///
/// Creates a poem owned by the caller. Returns 201 with the poem.
pub async fn create_poem(
    State(ledger): State<PopularityLedger>,
    AuthUser(user): AuthUser,
    payload: Result<Json<PoemDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<PoemView>), BackendError> {
    let Json(draft) = payload?;
    let draft = draft.validate()?;

    let poem = ledger.on_poem_created(&user, draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(poem.view(Some(AuthorSummary::from(&user)))),
    ))
}

/// PUT /api/poems/:id
///
/// Only the author may edit. Ownership is checked before the body is
/// validated.
pub async fn update_poem(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<PoemDraft>, JsonRejection>,
) -> Result<Json<PoemView>, BackendError> {
    let poem = load_poem(&store, &id).await?;
    ensure_owner(&user, &poem, "edit")?;

    let Json(draft) = payload?;
    let draft = draft.validate()?;

    let updated = store
        .update_poem(poem.id, &draft.title, &draft.content)
        .await?
        .ok_or_else(|| BackendError::not_found(POEM_NOT_FOUND))?;

    tracing::info!("Poem {} updated by {}", updated.id, user.id);
    Ok(Json(updated.view(Some(AuthorSummary::from(&user)))))
}

/// DELETE /api/poems/:id
///
/// Only the author may delete. The poem's readers are released from the
/// author's popularity in the same transition.
pub async fn delete_poem(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, BackendError> {
    let poem = load_poem(&state.store, &id).await?;
    ensure_owner(&user, &poem, "delete")?;

    state.ledger.on_poem_deleted(&poem).await?;

    Ok(Json(DeletedResponse {
        message: "Poem deleted".to_string(),
    }))
}

/// POST /api/poems/:id/read
///
/// Counts the caller as a reader of the poem, once.
pub async fn read_poem(
    State(ledger): State<PopularityLedger>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ReadResponse>, BackendError> {
    let poem_id = parse_id(&id, "Poem")?;
    let receipt = ledger.on_poem_read(poem_id, user.id).await?;

    let (message, recorded) = match receipt.status {
        ReadStatus::Recorded => (READ_RECORDED, true),
        ReadStatus::AlreadyRecorded => (ALREADY_READ, false),
    };

    Ok(Json(ReadResponse {
        message: message.to_string(),
        recorded,
        read_count: receipt.read_count,
        author_popularity: receipt.author_popularity,
    }))
}

/// GET /api/poems/user/:user_id
///
/// One author's poems, newest first. A well-formed id of an unknown user has
/// no poems.
pub async fn list_user_poems(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PoemView>>, BackendError> {
    let author = parse_id(&user_id, "User")?;
    let poems = store.list_poems(Some(author)).await?;
    Ok(Json(with_authors(&store, poems).await?))
}
