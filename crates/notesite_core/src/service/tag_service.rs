//! Tag use-case service.
//!
//! # Responsibility
//! - Load tags for admin views and apply tag form actions.
//!
//! # Invariants
//! - Tag drafts are validated before any mutation request is sent.

use crate::api::tag_api::TagApi;
use crate::model::tag::{NewTag, Tag, TagId};
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

pub struct TagService<A: TagApi> {
    api: A,
}

impl<A: TagApi> TagService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn list_tags(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.api.list_tags().await?)
    }

    /// Loads one tag for the edit form.
    pub async fn tag_page(&self, slug: &str) -> ServiceResult<Tag> {
        self.api
            .get_tag(slug)
            .await?
            .ok_or_else(|| ServiceError::TagNotFound(slug.to_string()))
    }

    pub async fn create_tag(&self, draft: &NewTag) -> ServiceResult<()> {
        draft.validate()?;
        self.api.create_tag(draft).await?;
        info!("event=tag_create module=service status=ok");
        Ok(())
    }

    pub async fn update_tag(&self, tag: &Tag) -> ServiceResult<()> {
        tag.validate()?;
        self.api.update_tag(tag).await?;
        info!("event=tag_update module=service status=ok tag_id={}", tag.id);
        Ok(())
    }

    pub async fn delete_tag(&self, tag_id: TagId) -> ServiceResult<()> {
        self.api.delete_tag(tag_id).await?;
        info!("event=tag_delete module=service status=ok tag_id={tag_id}");
        Ok(())
    }
}
