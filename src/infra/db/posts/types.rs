use time::OffsetDateTime;

use crate::domain::entities::{CategoryRecord, PostCategoryLink, PostRecord};

pub(super) const POST_COLUMNS: &str = "p.id, p.slug, p.title, p.content, p.description, \
     p.image, p.published, p.created_at, p.updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: i32,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) description: String,
    pub(crate) image: Option<String>,
    pub(crate) published: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            description: row.description,
            image: row.image,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A `post_categories` row joined with its category.
#[derive(sqlx::FromRow)]
pub(crate) struct PostCategoryRow {
    pub(crate) post_id: i32,
    pub(crate) category_id: i32,
    pub(crate) slug: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostCategoryRow> for PostCategoryLink {
    fn from(row: PostCategoryRow) -> Self {
        Self {
            post_id: row.post_id,
            category_id: row.category_id,
            category: CategoryRecord {
                id: row.category_id,
                slug: row.slug,
                name: row.name,
                description: row.description,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}
