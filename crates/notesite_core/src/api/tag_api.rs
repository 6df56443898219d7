//! Tag and note↔tag association endpoints of the data API.

use crate::api::client::{path_segment, ApiClient, ApiResult};
use crate::model::note::NoteId;
use crate::model::tag::{NewTag, NoteTagLink, Tag, TagId};
use async_trait::async_trait;

/// Repository-style contract for tags and associations.
#[async_trait]
pub trait TagApi: Send + Sync {
    async fn list_tags(&self) -> ApiResult<Vec<Tag>>;
    /// Fetches one tag by slug; `Ok(None)` when unknown.
    async fn get_tag(&self, slug: &str) -> ApiResult<Option<Tag>>;
    async fn create_tag(&self, tag: &NewTag) -> ApiResult<()>;
    async fn update_tag(&self, tag: &Tag) -> ApiResult<()>;
    async fn delete_tag(&self, tag_id: TagId) -> ApiResult<()>;
    /// Lists tag ids currently associated with a note.
    async fn tag_ids_for_note(&self, note_id: NoteId) -> ApiResult<Vec<TagId>>;
    /// Creates one note↔tag association.
    async fn link_tag(&self, note_id: NoteId, tag_id: TagId) -> ApiResult<()>;
    /// Removes one note↔tag association.
    async fn unlink_tag(&self, note_id: NoteId, tag_id: TagId) -> ApiResult<()>;
}

#[async_trait]
impl TagApi for ApiClient {
    async fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        self.get_json("/tags").await
    }

    async fn get_tag(&self, slug: &str) -> ApiResult<Option<Tag>> {
        self.get_optional_json(&format!("/tags/{}", path_segment(slug)))
            .await
    }

    async fn create_tag(&self, tag: &NewTag) -> ApiResult<()> {
        self.post("/tags", tag).await
    }

    async fn update_tag(&self, tag: &Tag) -> ApiResult<()> {
        self.put("/tags", tag).await
    }

    async fn delete_tag(&self, tag_id: TagId) -> ApiResult<()> {
        self.delete(&format!("/tags/{tag_id}")).await
    }

    async fn tag_ids_for_note(&self, note_id: NoteId) -> ApiResult<Vec<TagId>> {
        self.get_json(&format!("/notesToTags/notes/{note_id}"))
            .await
    }

    async fn link_tag(&self, note_id: NoteId, tag_id: TagId) -> ApiResult<()> {
        self.post("/notesToTags", &NoteTagLink { note_id, tag_id })
            .await
    }

    async fn unlink_tag(&self, note_id: NoteId, tag_id: TagId) -> ApiResult<()> {
        self.delete(&format!("/notesToTags/{note_id}/{tag_id}"))
            .await
    }
}
