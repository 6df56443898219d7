//! Post endpoints. Posts use the older `getPosts`/`createPost` routes.

use crate::api::client::{path_segment, ApiClient, ApiResult};
use crate::model::post::Post;
use async_trait::async_trait;

#[async_trait]
pub trait PostApi: Send + Sync {
    async fn list_posts(&self) -> ApiResult<Vec<Post>>;
    async fn get_post(&self, slug: &str) -> ApiResult<Option<Post>>;
    async fn create_post(&self, post: &Post) -> ApiResult<()>;
    /// Posts are deleted by slug, unlike notes and tags.
    async fn delete_post(&self, slug: &str) -> ApiResult<()>;
}

#[async_trait]
impl PostApi for ApiClient {
    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        self.get_json("/getPosts").await
    }

    async fn get_post(&self, slug: &str) -> ApiResult<Option<Post>> {
        self.get_optional_json(&format!("/posts/{}", path_segment(slug)))
            .await
    }

    async fn create_post(&self, post: &Post) -> ApiResult<()> {
        self.post("/createPost", post).await
    }

    async fn delete_post(&self, slug: &str) -> ApiResult<()> {
        self.delete(&format!("/posts/{}", path_segment(slug))).await
    }
}
