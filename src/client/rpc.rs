use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use quire_rpc_types::{
    CategoryIdInput, CategoryInput, CategoryUpdateInput, DeleteResult, IdInput, PostInput,
    PostUpdateInput, RpcRequest, SlugInput, methods,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use super::error::ClientError;
use super::normalize::{
    ApiCategory, ApiPost, WireCategory, WirePost, normalize_category, normalize_post,
};
use super::transport::RpcTransport;

/// Typed calls for every procedure. Results come back normalized.
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    /// Issues one call and decodes its result.
    pub async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, ClientError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params =
            serde_json::to_value(params).map_err(|source| ClientError::Encode { method, source })?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(target: "quire::client", id, method, "calling procedure");

        let response = self
            .transport
            .send(vec![RpcRequest::new(id, method, params)])
            .await?
            .into_iter()
            .find(|response| response.id == id)
            .ok_or(ClientError::MissingResponse(id))?;

        let value = response.into_outcome().map_err(ClientError::Rpc)?;
        serde_json::from_value(value).map_err(|source| ClientError::Decode { method, source })
    }

    // ----- categories -----

    pub async fn create_category(&self, input: &CategoryInput) -> Result<ApiCategory, ClientError> {
        let raw: WireCategory = self.call(methods::CATEGORIES_CREATE, input).await?;
        Ok(normalize_category(raw))
    }

    pub async fn categories(&self) -> Result<Vec<ApiCategory>, ClientError> {
        let raw: Option<Vec<WireCategory>> =
            self.call(methods::CATEGORIES_GET_ALL, &Value::Null).await?;
        Ok(raw.unwrap_or_default().into_iter().map(normalize_category).collect())
    }

    pub async fn categories_count(&self) -> Result<u64, ClientError> {
        let count: Option<u64> = self.call(methods::CATEGORIES_COUNT, &Value::Null).await?;
        Ok(count.unwrap_or(0))
    }

    pub async fn category_by_slug(&self, slug: &str) -> Result<Option<ApiCategory>, ClientError> {
        let input = SlugInput {
            slug: slug.to_string(),
        };
        let raw: Option<WireCategory> = self.call(methods::CATEGORIES_GET_BY_SLUG, &input).await?;
        Ok(raw.map(normalize_category))
    }

    /// `None` when no category has the id.
    pub async fn update_category(
        &self,
        input: &CategoryUpdateInput,
    ) -> Result<Option<ApiCategory>, ClientError> {
        let raw: Option<WireCategory> = self.call(methods::CATEGORIES_UPDATE, input).await?;
        Ok(raw.map(normalize_category))
    }

    pub async fn delete_category(&self, id: i32) -> Result<DeleteResult, ClientError> {
        self.call(methods::CATEGORIES_DELETE, &IdInput { id }).await
    }

    // ----- posts -----

    pub async fn create_post(&self, input: &PostInput) -> Result<ApiPost, ClientError> {
        let raw: WirePost = self.call(methods::POSTS_CREATE, input).await?;
        Ok(normalize_post(raw))
    }

    pub async fn posts(&self) -> Result<Vec<ApiPost>, ClientError> {
        let raw: Option<Vec<WirePost>> = self.call(methods::POSTS_GET_ALL, &Value::Null).await?;
        Ok(raw.unwrap_or_default().into_iter().map(normalize_post).collect())
    }

    pub async fn posts_count(&self) -> Result<u64, ClientError> {
        let count: Option<u64> = self.call(methods::POSTS_COUNT, &Value::Null).await?;
        Ok(count.unwrap_or(0))
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<ApiPost>, ClientError> {
        let input = SlugInput {
            slug: slug.to_string(),
        };
        let raw: Option<WirePost> = self.call(methods::POSTS_GET_BY_SLUG, &input).await?;
        Ok(raw.map(normalize_post))
    }

    pub async fn posts_by_category(&self, category_id: i32) -> Result<Vec<ApiPost>, ClientError> {
        let input = CategoryIdInput { category_id };
        let raw: Option<Vec<WirePost>> = self.call(methods::POSTS_GET_BY_CATEGORY, &input).await?;
        Ok(raw.unwrap_or_default().into_iter().map(normalize_post).collect())
    }

    pub async fn update_post(
        &self,
        input: &PostUpdateInput,
    ) -> Result<Option<ApiPost>, ClientError> {
        let raw: Option<WirePost> = self.call(methods::POSTS_UPDATE, input).await?;
        Ok(raw.map(normalize_post))
    }

    pub async fn delete_post(&self, id: i32) -> Result<DeleteResult, ClientError> {
        self.call(methods::POSTS_DELETE, &IdInput { id }).await
    }
}
