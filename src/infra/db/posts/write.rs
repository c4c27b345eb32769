use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::infra::db::util::map_sqlx_error;

use super::PostgresRepositories;
use super::types::PostRow;

const RETURNING_POST: &str =
    "RETURNING id, slug, title, content, description, image, published, created_at, updated_at";

async fn insert_links(
    tx: &mut Transaction<'_, Postgres>,
    post_id: i32,
    category_ids: &[i32],
) -> Result<(), RepoError> {
    if category_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_categories (post_id, category_id)
        SELECT $1, category_id
        FROM UNNEST($2::int4[]) AS t(category_id)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(category_ids)
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            slug,
            title,
            content,
            description,
            image,
            published,
            category_ids,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let sql = format!(
            "INSERT INTO posts (slug, title, content, description, image, published) \
             VALUES ($1, $2, $3, $4, $5, $6) {RETURNING_POST}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .bind(title)
            .bind(content)
            .bind(description)
            .bind(image)
            .bind(published)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        insert_links(&mut tx, row.id, &category_ids).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<Option<PostRecord>, RepoError> {
        let UpdatePostParams {
            id,
            slug,
            title,
            content,
            description,
            image,
            published,
            category_ids,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let sql = format!(
            "UPDATE posts \
             SET slug = $2, title = $3, content = $4, description = $5, image = $6, \
                 published = $7, updated_at = now() \
             WHERE id = $1 {RETURNING_POST}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(slug)
            .bind(title)
            .bind(content)
            .bind(description)
            .bind(image)
            .bind(published)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(None);
        };

        if let Some(category_ids) = category_ids {
            sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            insert_links(&mut tx, id, &category_ids).await?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(row.into()))
    }

    async fn delete_post(&self, id: i32) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
