//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{CategoryRecord, PostRecord, PostWithCategories};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError>;
    async fn count(&self) -> Result<u64, RepoError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;
    /// Returns `None` when no category has the given id.
    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<Option<CategoryRecord>, RepoError>;
    /// Removes the category and its post links. Missing ids are not an error.
    async fn delete_category(&self, id: i32) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostListFilter {
    pub category_id: Option<i32>,
    pub published: Option<bool>,
}

impl PostListFilter {
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    pub fn in_category(category_id: i32) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts with nested category links, newest first (`created_at`, then `id`).
    async fn list_posts(&self, filter: PostListFilter)
    -> Result<Vec<PostWithCategories>, RepoError>;
    async fn count_posts(&self, filter: PostListFilter) -> Result<u64, RepoError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub image: Option<String>,
    pub published: bool,
    pub category_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub image: Option<String>,
    pub published: bool,
    /// `Some` replaces the whole link set, `None` keeps it.
    pub category_ids: Option<Vec<i32>>,
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Inserts the post and its category links atomically.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;
    /// Updates the row and replaces its links atomically. Returns `None`
    /// without side effects when the id is unknown.
    async fn update_post(&self, params: UpdatePostParams) -> Result<Option<PostRecord>, RepoError>;
    async fn delete_post(&self, id: i32) -> Result<(), RepoError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
