//! Read model for the public reading site.

use std::sync::Arc;

use crate::application::listing::{ListingState, RECENT_POSTS, total_pages};
use crate::application::repos::{CategoriesRepo, PostListFilter, PostsRepo, RepoError};
use crate::domain::blocks::{ContentBlock, split_blocks};
use crate::domain::entities::PostWithCategories;

#[derive(Debug, Clone, Default)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct IndexContent {
    pub recent: Vec<PostWithCategories>,
    pub posts: Vec<PostWithCategories>,
    pub category_names: Vec<String>,
    pub listing: ListingState,
    pub total_pages: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostWithCategories,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Clone)]
pub struct SiteService {
    posts: Arc<dyn PostsRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl SiteService {
    pub fn new(posts: Arc<dyn PostsRepo>, categories: Arc<dyn CategoriesRepo>) -> Self {
        Self { posts, categories }
    }

    /// Published posts filtered and paginated the way the listing page shows
    /// them. An out-of-range page leaves the listing on page 1.
    pub async fn index(&self, query: IndexQuery) -> Result<IndexContent, RepoError> {
        let published = self.posts.list_posts(PostListFilter::published()).await?;
        let mut category_names: Vec<String> = self
            .categories
            .list_all()
            .await?
            .into_iter()
            .map(|category| category.name)
            .collect();
        category_names.sort();
        category_names.dedup();

        let mut listing = ListingState::new();
        if let Some(search) = query.search {
            listing.set_query(search);
        }
        if let Some(category) = query.category {
            listing.set_category(category);
        }

        let total_matches = published.iter().filter(|post| listing.matches(*post)).count();
        let total_pages = total_pages(total_matches);
        if let Some(page) = query.page {
            listing.go_to_page(page, total_pages);
        }

        let posts: Vec<PostWithCategories> = listing
            .view(&published)
            .items
            .into_iter()
            .cloned()
            .collect();
        let recent: Vec<PostWithCategories> =
            published.iter().take(RECENT_POSTS).cloned().collect();

        Ok(IndexContent {
            recent,
            posts,
            category_names,
            listing,
            total_pages,
            total_matches,
        })
    }

    /// Detail of a published post; drafts read as absent.
    pub async fn post(&self, slug: &str) -> Result<Option<PostDetail>, RepoError> {
        let Some(post) = self.posts.find_by_slug(slug).await? else {
            return Ok(None);
        };
        if !post.post.published {
            return Ok(None);
        }
        let blocks = split_blocks(&post.post.content);
        Ok(Some(PostDetail { post, blocks }))
    }
}
