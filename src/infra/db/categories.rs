use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{
        CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError,
        UpdateCategoryParams,
    },
    domain::entities::CategoryRecord,
};

use super::PostgresRepositories;
use super::util::{convert_count, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    slug: String,
    name: String,
    description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, slug, name, description, created_at, updated_at
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(total)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, slug, name, description, created_at, updated_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }
}

#[async_trait]
impl CategoriesWriteRepo for PostgresRepositories {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let CreateCategoryParams {
            slug,
            name,
            description,
        } = params;

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (slug, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, slug, name, description, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<Option<CategoryRecord>, RepoError> {
        let UpdateCategoryParams {
            id,
            slug,
            name,
            description,
        } = params;

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET slug = $2,
                name = $3,
                description = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING id, slug, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(name)
        .bind(description)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn delete_category(&self, id: i32) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
