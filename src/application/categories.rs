use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;
use crate::domain::validation::{CategoryDraft, ValidationErrors};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryCommand {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
}

impl CategoryService {
    pub fn new(reader: Arc<dyn CategoriesRepo>, writer: Arc<dyn CategoriesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list_all(&self) -> Result<Vec<CategoryRecord>, CategoryError> {
        self.reader.list_all().await.map_err(CategoryError::from)
    }

    pub async fn count(&self) -> Result<u64, CategoryError> {
        self.reader.count().await.map_err(CategoryError::from)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, CategoryError> {
        self.reader
            .find_by_slug(slug)
            .await
            .map_err(CategoryError::from)
    }

    /// Creates a category. A name whose slug is already taken fails with
    /// [`RepoError::Duplicate`].
    pub async fn create(
        &self,
        command: CreateCategoryCommand,
    ) -> Result<CategoryRecord, CategoryError> {
        let draft = CategoryDraft::parse(&command.name, command.description.as_deref())?;

        let category = self
            .writer
            .create_category(CreateCategoryParams {
                slug: draft.slug,
                name: draft.name,
                description: draft.description,
            })
            .await?;

        info!(
            target: "quire::categories",
            category_id = category.id,
            slug = %category.slug,
            "category created"
        );
        Ok(category)
    }

    /// Overwrites name, description and slug. Returns `None` for unknown ids.
    pub async fn update(
        &self,
        command: UpdateCategoryCommand,
    ) -> Result<Option<CategoryRecord>, CategoryError> {
        let draft = CategoryDraft::parse(&command.name, command.description.as_deref())?;

        let updated = self
            .writer
            .update_category(UpdateCategoryParams {
                id: command.id,
                slug: draft.slug,
                name: draft.name,
                description: draft.description,
            })
            .await?;

        match updated.as_ref() {
            Some(category) => info!(
                target: "quire::categories",
                category_id = category.id,
                slug = %category.slug,
                "category updated"
            ),
            None => info!(
                target: "quire::categories",
                category_id = command.id,
                "category update skipped; no such id"
            ),
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), CategoryError> {
        self.writer.delete_category(id).await?;
        info!(target: "quire::categories", category_id = id, "category deleted");
        Ok(())
    }
}
