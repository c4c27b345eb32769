use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CreatePostParams, PostListFilter, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{PostRecord, PostWithCategories};
use crate::domain::validation::{PostDraft, PostFields, ValidationErrors};

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub published: bool,
    pub category_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub published: bool,
    pub category_ids: Option<Vec<i32>>,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list_all(&self) -> Result<Vec<PostWithCategories>, PostError> {
        self.reader
            .list_posts(PostListFilter::default())
            .await
            .map_err(PostError::from)
    }

    pub async fn list_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<PostWithCategories>, PostError> {
        self.reader
            .list_posts(PostListFilter::in_category(category_id))
            .await
            .map_err(PostError::from)
    }

    pub async fn count(&self) -> Result<u64, PostError> {
        self.reader
            .count_posts(PostListFilter::default())
            .await
            .map_err(PostError::from)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, PostError> {
        self.reader
            .find_by_slug(slug)
            .await
            .map_err(PostError::from)
    }

    /// Creates a post together with its category links. The returned record
    /// carries no nested categories; fetch it again to see them.
    pub async fn create(&self, command: CreatePostCommand) -> Result<PostRecord, PostError> {
        let draft = PostDraft::parse(PostFields {
            title: &command.title,
            content: &command.content,
            description: command.description.as_deref(),
            image: command.image.as_deref(),
            published: command.published,
            category_ids: Some(&command.category_ids),
        })?;

        let category_ids = draft.category_ids.unwrap_or_default();
        let link_count = category_ids.len();
        let post = self
            .writer
            .create_post(CreatePostParams {
                slug: draft.slug,
                title: draft.title,
                content: draft.content,
                description: draft.description,
                image: draft.image,
                published: draft.published,
                category_ids,
            })
            .await?;

        info!(
            target: "quire::posts",
            post_id = post.id,
            slug = %post.slug,
            published = post.published,
            categories = link_count,
            "post created"
        );
        Ok(post)
    }

    /// Overwrites the post and, when `category_ids` is given, replaces its
    /// links in the same transaction. Returns `None` for unknown ids.
    pub async fn update(
        &self,
        command: UpdatePostCommand,
    ) -> Result<Option<PostRecord>, PostError> {
        let draft = PostDraft::parse(PostFields {
            title: &command.title,
            content: &command.content,
            description: command.description.as_deref(),
            image: command.image.as_deref(),
            published: command.published,
            category_ids: command.category_ids.as_deref(),
        })?;

        let updated = self
            .writer
            .update_post(UpdatePostParams {
                id: command.id,
                slug: draft.slug,
                title: draft.title,
                content: draft.content,
                description: draft.description,
                image: draft.image,
                published: draft.published,
                category_ids: draft.category_ids,
            })
            .await?;

        match updated.as_ref() {
            Some(post) => info!(
                target: "quire::posts",
                post_id = post.id,
                slug = %post.slug,
                published = post.published,
                "post updated"
            ),
            None => info!(
                target: "quire::posts",
                post_id = command.id,
                "post update skipped; no such id"
            ),
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), PostError> {
        self.writer.delete_post(id).await?;
        info!(target: "quire::posts", post_id = id, "post deleted");
        Ok(())
    }
}
