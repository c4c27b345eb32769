#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime, macros::datetime};
use tokio::sync::Mutex;

use quire::application::categories::CategoryService;
use quire::application::posts::PostService;
use quire::application::procedures::ProcedureRouter;
use quire::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, CreatePostParams, PostListFilter,
    PostsRepo, PostsWriteRepo, RepoError, StoreHealth, UpdateCategoryParams, UpdatePostParams,
};
use quire::application::site::SiteService;
use quire::client::{CategoriesStore, InProcessTransport, PostsStore, RpcClient};
use quire::domain::entities::{CategoryRecord, PostCategoryLink, PostRecord, PostWithCategories};
use quire::infra::http::HttpState;
use quire::presentation::views::LayoutChrome;

#[derive(Default)]
struct Tables {
    categories: Vec<CategoryRecord>,
    posts: Vec<PostRecord>,
    links: BTreeSet<(i32, i32)>,
    next_category_id: i32,
    next_post_id: i32,
    ticks: i64,
}

/// Column widths from the migration.
const CATEGORY_SLUG_CHARS: usize = 150;
const POST_SLUG_CHARS: usize = 200;

fn check_width(value: &str, width: usize) -> Result<(), RepoError> {
    if value.chars().count() > width {
        Err(RepoError::InvalidInput {
            message: format!("value too long for type character varying({width})"),
        })
    } else {
        Ok(())
    }
}

impl Tables {
    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn now(&mut self) -> OffsetDateTime {
        self.ticks += 1;
        datetime!(2025-03-01 09:00 UTC) + Duration::minutes(self.ticks)
    }

    fn category_exists(&self, id: i32) -> bool {
        self.categories.iter().any(|category| category.id == id)
    }

    fn check_links(&self, ids: &[i32]) -> Result<(), RepoError> {
        match ids.iter().find(|id| !self.category_exists(**id)) {
            Some(missing) => Err(RepoError::InvalidInput {
                message: format!(
                    "insert or update on table \"post_categories\" violates \
                     foreign key constraint (category {missing})"
                ),
            }),
            None => Ok(()),
        }
    }

    fn with_categories(&self, post: &PostRecord) -> PostWithCategories {
        let mut categories: Vec<PostCategoryLink> = self
            .links
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(post_id, category_id)| {
                self.categories
                    .iter()
                    .find(|category| category.id == *category_id)
                    .map(|category| PostCategoryLink {
                        post_id: *post_id,
                        category_id: *category_id,
                        category: category.clone(),
                    })
            })
            .collect();
        categories.sort_by(|a, b| {
            a.category
                .name
                .cmp(&b.category.name)
                .then(a.category_id.cmp(&b.category_id))
        });
        PostWithCategories {
            post: post.clone(),
            categories,
        }
    }

    fn matches(&self, post: &PostRecord, filter: PostListFilter) -> bool {
        let published = filter.published.is_none_or(|flag| post.published == flag);
        let in_category = filter
            .category_id
            .is_none_or(|category_id| self.links.contains(&(post.id, category_id)));
        published && in_category
    }
}

/// In-memory stand-in for the Postgres repositories with the same unique,
/// foreign-key and cascade behaviour.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every call fail with a timeout until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn link_count(&self) -> usize {
        self.tables.lock().await.links.len()
    }

    fn check_online(&self) -> Result<(), RepoError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CategoriesRepo for MemoryStore {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        let mut categories = tables.categories.clone();
        categories.sort_by_key(|category| category.id);
        Ok(categories)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.check_online()?;
        Ok(self.tables.lock().await.categories.len() as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for MemoryStore {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        self.check_online()?;
        check_width(&params.slug, CATEGORY_SLUG_CHARS)?;
        let mut tables = self.tables.lock().await;
        if tables.categories.iter().any(|c| c.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".to_string(),
            });
        }
        tables.next_category_id += 1;
        let now = tables.now();
        let record = CategoryRecord {
            id: tables.next_category_id,
            slug: params.slug,
            name: params.name,
            description: params.description,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(record.clone());
        Ok(record)
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<Option<CategoryRecord>, RepoError> {
        self.check_online()?;
        check_width(&params.slug, CATEGORY_SLUG_CHARS)?;
        let mut tables = self.tables.lock().await;
        if tables
            .categories
            .iter()
            .any(|c| c.slug == params.slug && c.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".to_string(),
            });
        }
        let now = tables.now();
        let Some(record) = tables.categories.iter_mut().find(|c| c.id == params.id) else {
            return Ok(None);
        };
        record.slug = params.slug;
        record.name = params.name;
        record.description = params.description;
        record.updated_at = now;
        Ok(Some(record.clone()))
    }

    async fn delete_category(&self, id: i32) -> Result<(), RepoError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        tables.categories.retain(|c| c.id != id);
        tables.links.retain(|(_, category_id)| *category_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn list_posts(
        &self,
        filter: PostListFilter,
    ) -> Result<Vec<PostWithCategories>, RepoError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        let mut posts: Vec<&PostRecord> = tables
            .posts
            .iter()
            .filter(|post| tables.matches(post, filter))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts
            .into_iter()
            .map(|post| tables.with_categories(post))
            .collect())
    }

    async fn count_posts(&self, filter: PostListFilter) -> Result<u64, RepoError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .posts
            .iter()
            .filter(|post| tables.matches(post, filter))
            .count() as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .map(|post| tables.with_categories(post)))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        self.check_online()?;
        check_width(&params.slug, POST_SLUG_CHARS)?;
        let mut tables = self.tables.lock().await;
        if tables.posts.iter().any(|p| p.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }
        tables.check_links(&params.category_ids)?;

        tables.next_post_id += 1;
        let now = tables.now();
        let record = PostRecord {
            id: tables.next_post_id,
            slug: params.slug,
            title: params.title,
            content: params.content,
            description: params.description,
            image: params.image,
            published: params.published,
            created_at: now,
            updated_at: now,
        };
        for category_id in &params.category_ids {
            tables.links.insert((record.id, *category_id));
        }
        tables.posts.push(record.clone());
        Ok(record)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<Option<PostRecord>, RepoError> {
        self.check_online()?;
        check_width(&params.slug, POST_SLUG_CHARS)?;
        let mut tables = self.tables.lock().await;
        if !tables.posts.iter().any(|p| p.id == params.id) {
            return Ok(None);
        }
        if tables
            .posts
            .iter()
            .any(|p| p.slug == params.slug && p.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }
        if let Some(ids) = params.category_ids.as_deref() {
            tables.check_links(ids)?;
        }

        let now = tables.now();
        if let Some(ids) = params.category_ids {
            tables.links.retain(|(post_id, _)| *post_id != params.id);
            for category_id in ids {
                tables.links.insert((params.id, category_id));
            }
        }
        let Some(record) = tables.posts.iter_mut().find(|p| p.id == params.id) else {
            return Ok(None);
        };
        record.slug = params.slug;
        record.title = params.title;
        record.content = params.content;
        record.description = params.description;
        record.image = params.image;
        record.published = params.published;
        record.updated_at = now;
        Ok(Some(record.clone()))
    }

    async fn delete_post(&self, id: i32) -> Result<(), RepoError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        tables.posts.retain(|p| p.id != id);
        tables.links.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check_online()
    }
}

pub fn procedure_router(store: &Arc<MemoryStore>) -> Arc<ProcedureRouter> {
    let categories_repo: Arc<dyn CategoriesRepo> = store.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = store.clone();
    let posts_repo: Arc<dyn PostsRepo> = store.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = store.clone();

    Arc::new(ProcedureRouter::new(
        CategoryService::new(categories_repo, categories_write_repo),
        PostService::new(posts_repo, posts_write_repo),
    ))
}

pub fn http_state(store: &Arc<MemoryStore>) -> HttpState {
    let categories_repo: Arc<dyn CategoriesRepo> = store.clone();
    let posts_repo: Arc<dyn PostsRepo> = store.clone();
    let health: Arc<dyn StoreHealth> = store.clone();

    HttpState {
        site: Arc::new(SiteService::new(posts_repo, categories_repo)),
        procedures: procedure_router(store),
        health,
        chrome: LayoutChrome {
            site_title: "Quire Test".to_string(),
            tagline: "Notes for tests".to_string(),
        },
    }
}

pub fn rpc_client(store: &Arc<MemoryStore>) -> Arc<RpcClient> {
    let transport = InProcessTransport::new(procedure_router(store));
    Arc::new(RpcClient::new(Arc::new(transport)))
}

pub fn stores(store: &Arc<MemoryStore>) -> (PostsStore, CategoriesStore) {
    let client = rpc_client(store);
    (PostsStore::new(client.clone()), CategoriesStore::new(client))
}
