use quire_rpc_types::{
    CategoryIdInput, DeleteResult, IdInput, PostDto, PostInput, PostUpdateInput,
    PostWithCategoriesDto, SlugInput,
};

use super::ProcedureError;
use crate::application::posts::{CreatePostCommand, PostService, UpdatePostCommand};

pub(super) async fn create(
    service: &PostService,
    input: PostInput,
) -> Result<PostDto, ProcedureError> {
    let record = service
        .create(CreatePostCommand {
            title: input.title,
            content: input.content,
            description: input.description,
            image: input.image,
            published: input.published,
            category_ids: input.category_ids,
        })
        .await?;
    Ok(record.into())
}

pub(super) async fn get_all(
    service: &PostService,
) -> Result<Vec<PostWithCategoriesDto>, ProcedureError> {
    let posts = service.list_all().await?;
    Ok(posts.into_iter().map(Into::into).collect())
}

pub(super) async fn count(service: &PostService) -> Result<u64, ProcedureError> {
    Ok(service.count().await?)
}

pub(super) async fn get_by_slug(
    service: &PostService,
    input: SlugInput,
) -> Result<Option<PostWithCategoriesDto>, ProcedureError> {
    let post = service.find_by_slug(&input.slug).await?;
    Ok(post.map(Into::into))
}

pub(super) async fn get_by_category(
    service: &PostService,
    input: CategoryIdInput,
) -> Result<Vec<PostWithCategoriesDto>, ProcedureError> {
    let posts = service.list_by_category(input.category_id).await?;
    Ok(posts.into_iter().map(Into::into).collect())
}

pub(super) async fn update(
    service: &PostService,
    input: PostUpdateInput,
) -> Result<Option<PostDto>, ProcedureError> {
    let record = service
        .update(UpdatePostCommand {
            id: input.id,
            title: input.title,
            content: input.content,
            description: input.description,
            image: input.image,
            published: input.published,
            category_ids: input.category_ids,
        })
        .await?;
    Ok(record.map(Into::into))
}

pub(super) async fn delete(
    service: &PostService,
    input: IdInput,
) -> Result<DeleteResult, ProcedureError> {
    service.delete(input.id).await?;
    Ok(DeleteResult::OK)
}
