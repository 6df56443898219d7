//! Note endpoints of the data API.
//!
//! # Responsibility
//! - Define the note use-case contract consumed by services.
//! - Map each operation onto its data API endpoint.
//!
//! # Invariants
//! - Lookups by slug return `Ok(None)` for unknown slugs.
//! - Mutations return an error on any non-success status.

use crate::api::client::{path_segment, ApiClient, ApiResult};
use crate::model::note::{NewNote, Note, NoteId, NoteSummary};
use crate::model::tag::TagId;
use async_trait::async_trait;

/// Repository-style contract for notes.
#[async_trait]
pub trait NoteApi: Send + Sync {
    /// Lists every note as `{slug, title}`.
    async fn list_notes(&self) -> ApiResult<Vec<NoteSummary>>;
    /// Fetches the most recently created note.
    async fn latest_note(&self) -> ApiResult<Option<Note>>;
    /// Fetches one note by slug.
    async fn get_note(&self, slug: &str) -> ApiResult<Option<Note>>;
    /// Lists notes associated with one tag.
    async fn list_notes_for_tag(&self, tag_id: TagId) -> ApiResult<Vec<NoteSummary>>;
    /// Creates a note and returns the assigned id.
    async fn create_note(&self, note: &NewNote) -> ApiResult<NoteId>;
    /// Replaces title, slug and markdown of an existing note.
    async fn update_note(&self, note: &Note) -> ApiResult<()>;
    async fn delete_note(&self, note_id: NoteId) -> ApiResult<()>;
}

#[async_trait]
impl NoteApi for ApiClient {
    async fn list_notes(&self) -> ApiResult<Vec<NoteSummary>> {
        self.get_json("/notes").await
    }

    async fn latest_note(&self) -> ApiResult<Option<Note>> {
        self.get_optional_json("/notes/latest").await
    }

    async fn get_note(&self, slug: &str) -> ApiResult<Option<Note>> {
        self.get_optional_json(&format!("/notes/{}", path_segment(slug)))
            .await
    }

    async fn list_notes_for_tag(&self, tag_id: TagId) -> ApiResult<Vec<NoteSummary>> {
        self.get_json(&format!("/notesToTags/tags/{tag_id}")).await
    }

    async fn create_note(&self, note: &NewNote) -> ApiResult<NoteId> {
        self.post_json("/notes", note).await
    }

    async fn update_note(&self, note: &Note) -> ApiResult<()> {
        self.put("/notes", note).await
    }

    async fn delete_note(&self, note_id: NoteId) -> ApiResult<()> {
        self.delete(&format!("/notes/{note_id}")).await
    }
}
