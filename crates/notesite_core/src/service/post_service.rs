//! Post use-case service.

use crate::api::post_api::PostApi;
use crate::model::post::Post;
use crate::render::markdown::MarkdownRenderer;
use crate::service::error::{require_markdown, ServiceError, ServiceResult};
use log::info;
use std::sync::Arc;

/// Post plus its rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPost {
    pub post: Post,
    pub html: String,
}

pub struct PostService<A: PostApi> {
    api: A,
    renderer: Arc<MarkdownRenderer>,
}

impl<A: PostApi> PostService<A> {
    pub fn new(api: A, renderer: Arc<MarkdownRenderer>) -> Self {
        Self { api, renderer }
    }

    pub async fn list_posts(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.api.list_posts().await?)
    }

    /// Loads and renders one post by slug.
    pub async fn post_page(&self, slug: &str) -> ServiceResult<RenderedPost> {
        let post = self
            .api
            .get_post(slug)
            .await?
            .ok_or_else(|| ServiceError::PostNotFound(slug.to_string()))?;
        require_markdown(&post.slug, &post.markdown)?;
        let html = self.renderer.render(&post.markdown);
        Ok(RenderedPost { post, html })
    }

    pub async fn create_post(&self, post: &Post) -> ServiceResult<()> {
        post.validate()?;
        self.api.create_post(post).await?;
        info!("event=post_create module=service status=ok");
        Ok(())
    }

    pub async fn delete_post(&self, slug: &str) -> ServiceResult<()> {
        self.api.delete_post(slug).await?;
        info!("event=post_delete module=service status=ok");
        Ok(())
    }
}
