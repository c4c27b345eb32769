use std::sync::{Arc, RwLock};

use quire_rpc_types::{CategoryInput, CategoryUpdateInput};
use tracing::warn;

use super::Activity;
use super::lock::{state_read, state_write};
use crate::client::error::ClientError;
use crate::client::normalize::ApiCategory;
use crate::client::rpc::RpcClient;

const STORE: &str = "categories";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoriesState {
    pub categories: Vec<ApiCategory>,
    pub count: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    categories: Vec<ApiCategory>,
    count: Option<u64>,
    activity: Activity,
}

pub struct CategoriesStore {
    client: Arc<RpcClient>,
    state: RwLock<Inner>,
}

impl CategoriesStore {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self {
            client,
            state: RwLock::new(Inner::default()),
        }
    }

    pub fn snapshot(&self) -> CategoriesState {
        let inner = state_read(&self.state, STORE, "snapshot");
        CategoriesState {
            categories: inner.categories.clone(),
            count: inner.count,
            loading: inner.activity.loading(),
            error: inner.activity.visible_error(),
        }
    }

    pub async fn fetch_categories(&self) {
        self.begin("fetch_categories");
        self.load_categories().await;
        self.finish("fetch_categories");
    }

    pub async fn fetch_categories_count(&self) {
        self.begin("fetch_categories_count");
        self.load_count().await;
        self.finish("fetch_categories_count");
    }

    /// Creates a category, then re-fetches the list and the count.
    pub async fn create_category(&self, input: CategoryInput) -> bool {
        self.begin("create_category");
        let created = match self.client.create_category(&input).await {
            Ok(_) => {
                tokio::join!(self.load_categories(), self.load_count());
                true
            }
            Err(err) => {
                self.fail("create_category", &err, "Failed to create category");
                false
            }
        };
        self.finish("create_category");
        created
    }

    /// Renames a category, then re-fetches the list.
    pub async fn update_category(&self, input: CategoryUpdateInput) -> bool {
        self.begin("update_category");
        let updated = match self.client.update_category(&input).await {
            Ok(Some(_)) => {
                self.load_categories().await;
                true
            }
            Ok(None) => {
                self.record_error(format!("Category {} not found", input.id));
                false
            }
            Err(err) => {
                self.fail("update_category", &err, "Failed to update category");
                false
            }
        };
        self.finish("update_category");
        updated
    }

    pub async fn delete_category(&self, id: i32) -> bool {
        self.begin("delete_category");
        let deleted = match self.client.delete_category(id).await {
            Ok(_) => {
                tokio::join!(self.load_categories(), self.load_count());
                true
            }
            Err(err) => {
                self.fail("delete_category", &err, "Failed to delete category");
                false
            }
        };
        self.finish("delete_category");
        deleted
    }

    async fn load_categories(&self) {
        match self.client.categories().await {
            Ok(categories) => {
                state_write(&self.state, STORE, "load_categories").categories = categories;
            }
            Err(err) => self.fail("load_categories", &err, "Failed to load categories"),
        }
    }

    async fn load_count(&self) {
        match self.client.categories_count().await {
            Ok(count) => {
                state_write(&self.state, STORE, "load_count").count = Some(count);
            }
            Err(err) => self.fail("load_count", &err, "Failed to fetch categories count"),
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
