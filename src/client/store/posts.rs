use std::sync::{Arc, RwLock};

use quire_rpc_types::{PostInput, PostUpdateInput};
use tracing::warn;

use super::Activity;
use super::lock::{state_read, state_write};
use crate::application::listing::RECENT_POSTS;
use crate::client::error::ClientError;
use crate::client::normalize::ApiPost;
use crate::client::rpc::RpcClient;

const STORE: &str = "posts";

/// Point-in-time copy of a [`PostsStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    pub posts: Vec<ApiPost>,
    /// First posts of the last fetched list.
    pub recent_posts: Vec<ApiPost>,
    /// `None` until a count has been fetched.
    pub count: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    posts: Vec<ApiPost>,
    recent_posts: Vec<ApiPost>,
    count: Option<u64>,
    activity: Activity,
}

pub struct PostsStore {
    client: Arc<RpcClient>,
    state: RwLock<Inner>,
}

impl PostsStore {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self {
            client,
            state: RwLock::new(Inner::default()),
        }
    }

    pub fn snapshot(&self) -> PostsState {
        let inner = state_read(&self.state, STORE, "snapshot");
        PostsState {
            posts: inner.posts.clone(),
            recent_posts: inner.recent_posts.clone(),
            count: inner.count,
            loading: inner.activity.loading(),
            error: inner.activity.visible_error(),
        }
    }

    /// Replaces the list and returns it. On failure the previous list stays
    /// and an empty vector is returned.
    pub async fn fetch_posts(&self) -> Vec<ApiPost> {
        self.begin("fetch_posts");
        let posts = self.load_posts().await;
        self.finish("fetch_posts");
        posts.unwrap_or_default()
    }

    pub async fn fetch_posts_count(&self) {
        self.begin("fetch_posts_count");
        self.load_count().await;
        self.finish("fetch_posts_count");
    }

    /// Looks a post up without touching the stored list.
    pub async fn get_by_slug(&self, slug: &str) -> Option<ApiPost> {
        self.begin("get_by_slug");
        let result = self.client.post_by_slug(slug).await;
        let post = match result {
            Ok(post) => post,
            Err(err) => {
                self.fail("get_by_slug", &err, "Failed to load post");
                None
            }
        };
        self.finish("get_by_slug");
        post
    }

    pub async fn get_by_category(&self, category_id: i32) -> Vec<ApiPost> {
        self.begin("get_by_category");
        let result = self.client.posts_by_category(category_id).await;
        let posts = match result {
            Ok(posts) => posts,
            Err(err) => {
                self.fail("get_by_category", &err, "Failed to load posts by category");
                Vec::new()
            }
        };
        self.finish("get_by_category");
        posts
    }

    /// Creates a post, then re-fetches the list and the count. Returns
    /// whether the create call succeeded.
    pub async fn create_post(&self, input: PostInput) -> bool {
        self.begin("create_post");
        let created = match self.client.create_post(&input).await {
            Ok(_) => {
                tokio::join!(self.load_posts(), self.load_count());
                true
            }
            Err(err) => {
                self.fail("create_post", &err, "Failed to create post");
                false
            }
        };
        self.finish("create_post");
        created
    }

    /// Updates a post, then re-fetches the list. An unknown id counts as a
    /// failure.
    pub async fn update_post(&self, input: PostUpdateInput) -> bool {
        self.begin("update_post");
        let updated = match self.client.update_post(&input).await {
            Ok(Some(_)) => {
                self.load_posts().await;
                true
            }
            Ok(None) => {
                self.record_error(format!("Post {} not found", input.id));
                false
            }
            Err(err) => {
                self.fail("update_post", &err, "Failed to update post");
                false
            }
        };
        self.finish("update_post");
        updated
    }

    pub async fn delete_post(&self, id: i32) -> bool {
        self.begin("delete_post");
        let deleted = match self.client.delete_post(id).await {
            Ok(_) => {
                tokio::join!(self.load_posts(), self.load_count());
                true
            }
            Err(err) => {
                self.fail("delete_post", &err, "Failed to delete post");
                false
            }
        };
        self.finish("delete_post");
        deleted
    }

    async fn load_posts(&self) -> Option<Vec<ApiPost>> {
        match self.client.posts().await {
            Ok(posts) => {
                let mut inner = state_write(&self.state, STORE, "load_posts");
                inner.recent_posts = posts.iter().take(RECENT_POSTS).cloned().collect();
                inner.posts = posts.clone();
                Some(posts)
            }
            Err(err) => {
                self.fail("load_posts", &err, "Failed to load posts");
                None
            }
        }
    }

    async fn load_count(&self) {
        match self.client.posts_count().await {
            Ok(count) => {
                state_write(&self.state, STORE, "load_count").count = Some(count);
            }
            Err(err) => self.fail("load_count", &err, "Failed to fetch posts count"),
        }
    }

    fn begin(&self, op: &'static str) {
        state_write(&self.state, STORE, op).activity.begin();
    }

    fn finish(&self, op: &'static str) {
        state_write(&self.state, STORE, op).activity.finish();
    }

    fn fail(&self, op: &'static str, err: &ClientError, fallback: &str) {
        warn!(target: "quire::client::store", store = STORE, op, error = %err, "store call failed");
        self.record_error(super::error_message(err, fallback));
    }

    fn record_error(&self, message: String) {
        state_write(&self.state, STORE, "record_error").activity.fail(message);
    }
}
