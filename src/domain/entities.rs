//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub content: String,
    /// Summary shown on cards; empty when the author gave none.
    pub description: String,
    pub image: Option<String>,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One row of `post_categories` joined with the linked category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCategoryLink {
    pub post_id: i32,
    pub category_id: i32,
    pub category: CategoryRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostWithCategories {
    pub post: PostRecord,
    pub categories: Vec<PostCategoryLink>,
}

impl PostWithCategories {
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(|link| link.category.name.as_str())
    }
}
