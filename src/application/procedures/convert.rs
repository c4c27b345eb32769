//! Domain records to wire DTOs.

use quire_rpc_types::{CategoryDto, PostCategoryLinkDto, PostDto, PostWithCategoriesDto};

use crate::domain::entities::{CategoryRecord, PostCategoryLink, PostRecord, PostWithCategories};

impl From<CategoryRecord> for CategoryDto {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            slug: record.slug,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<PostRecord> for PostDto {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            description: record.description,
            slug: record.slug,
            image: record.image,
            published: record.published,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<PostCategoryLink> for PostCategoryLinkDto {
    fn from(link: PostCategoryLink) -> Self {
        Self {
            post_id: link.post_id,
            category_id: link.category_id,
            category: link.category.into(),
        }
    }
}

impl From<PostWithCategories> for PostWithCategoriesDto {
    fn from(value: PostWithCategories) -> Self {
        Self {
            post: value.post.into(),
            categories: value.categories.into_iter().map(Into::into).collect(),
        }
    }
}
