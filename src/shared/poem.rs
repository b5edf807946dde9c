//! Poem wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{required_text, SharedError};
use crate::shared::user::AuthorSummary;

/// Body of `POST /api/poems` and `PUT /api/poems/:id`.
///
/// Fields are optional on the wire so that a missing field is reported as a
/// validation error instead of a decoder failure.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct PoemDraft {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    /// Trimmed title
    pub title: String,
    /// Body text, kept verbatim
    pub content: String,
}

impl PoemDraft {
    /// Validate the draft.
    ///
    /// The title is trimmed. The content keeps its whitespace (line breaks are
    /// part of a poem) but must contain something other than whitespace.
    pub fn validate(&self) -> Result<ValidDraft, SharedError> {
        let title = required_text("title", self.title.as_deref())?;
        required_text("content", self.content.as_deref())?;
        Ok(ValidDraft {
            title,
            content: self.content.clone().unwrap_or_default(),
        })
    }
}

/// Poem as returned by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoemView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    /// Author name captured when the poem was created
    pub author_name: String,
    /// Live author card; `None` if the author record is gone
    pub author: Option<AuthorSummary>,
    pub read_count: i64,
    pub distinct_readers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response of `POST /api/poems/:id/read`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    pub message: String,
    /// `false` when this reader had already been counted
    pub recorded: bool,
    pub read_count: i64,
    pub author_popularity: i64,
}
