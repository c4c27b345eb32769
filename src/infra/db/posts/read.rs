use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::application::repos::{PostListFilter, PostsRepo, RepoError};
use crate::domain::entities::{PostCategoryLink, PostRecord, PostWithCategories};
use crate::infra::db::util::{convert_count, map_sqlx_error};

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostCategoryRow, PostRow};

impl PostgresRepositories {
    fn apply_post_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: PostListFilter) {
        if let Some(published) = filter.published {
            qb.push(" AND p.published = ");
            qb.push_bind(published);
        }

        if let Some(category_id) = filter.category_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_categories pc \
                 WHERE pc.post_id = p.id AND pc.category_id = ",
            );
            qb.push_bind(category_id);
            qb.push(")");
        }
    }

    /// Loads the links of every post in one query and nests them.
    async fn attach_categories(
        &self,
        rows: Vec<PostRow>,
    ) -> Result<Vec<PostWithCategories>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let link_rows = sqlx::query_as::<_, PostCategoryRow>(
            r#"
            SELECT pc.post_id, pc.category_id, c.slug, c.name, c.description,
                   c.created_at, c.updated_at
            FROM post_categories pc
            INNER JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = ANY($1)
            ORDER BY c.name, c.id
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut links: HashMap<i32, Vec<PostCategoryLink>> = HashMap::new();
        for row in link_rows {
            links
                .entry(row.post_id)
                .or_default()
                .push(PostCategoryLink::from(row));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let categories = links.remove(&row.id).unwrap_or_default();
                PostWithCategories {
                    post: PostRecord::from(row),
                    categories,
                }
            })
            .collect())
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        filter: PostListFilter,
    ) -> Result<Vec<PostWithCategories>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts p WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC");

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        self.attach_categories(rows).await
    }

    async fn count_posts(&self, filter: PostListFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(total)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts p WHERE p.slug = ");
        qb.push_bind(slug);

        let row = qb
            .build_query_as::<PostRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(self.attach_categories(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}
