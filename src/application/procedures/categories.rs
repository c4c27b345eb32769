use quire_rpc_types::{
    CategoryDto, CategoryInput, CategoryUpdateInput, DeleteResult, IdInput, SlugInput,
};

use super::ProcedureError;
use crate::application::categories::{
    CategoryService, CreateCategoryCommand, UpdateCategoryCommand,
};

pub(super) async fn create(
    service: &CategoryService,
    input: CategoryInput,
) -> Result<CategoryDto, ProcedureError> {
    let record = service
        .create(CreateCategoryCommand {
            name: input.name,
            description: input.description,
        })
        .await?;
    Ok(record.into())
}

pub(super) async fn get_all(service: &CategoryService) -> Result<Vec<CategoryDto>, ProcedureError> {
    let records = service.list_all().await?;
    Ok(records.into_iter().map(Into::into).collect())
}

pub(super) async fn count(service: &CategoryService) -> Result<u64, ProcedureError> {
    Ok(service.count().await?)
}

pub(super) async fn get_by_slug(
    service: &CategoryService,
    input: SlugInput,
) -> Result<Option<CategoryDto>, ProcedureError> {
    let record = service.find_by_slug(&input.slug).await?;
    Ok(record.map(Into::into))
}

pub(super) async fn update(
    service: &CategoryService,
    input: CategoryUpdateInput,
) -> Result<Option<CategoryDto>, ProcedureError> {
    let record = service
        .update(UpdateCategoryCommand {
            id: input.id,
            name: input.name,
            description: input.description,
        })
        .await?;
    Ok(record.map(Into::into))
}

/// Reports success whether or not the id existed.
pub(super) async fn delete(
    service: &CategoryService,
    input: IdInput,
) -> Result<DeleteResult, ProcedureError> {
    service.delete(input.id).await?;
    Ok(DeleteResult::OK)
}
