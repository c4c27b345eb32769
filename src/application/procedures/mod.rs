//! Named procedures behind the RPC endpoint.
//!
//! [`ProcedureRouter`] maps a method name and JSON params onto the category
//! and post services. It knows nothing about HTTP, so the same router backs
//! the axum handler and the in-process client transport.

mod categories;
mod convert;
mod posts;

use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, histogram};
use quire_rpc_types::{RpcErrorBody, RpcErrorCode, RpcRequest, RpcResponse, methods};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::categories::{CategoryError, CategoryService};
use crate::application::posts::{PostError, PostService};
use crate::application::repos::RepoError;
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProcedureError {
    #[error("invalid params for `{method}`: {message}")]
    BadRequest { method: String, message: String },
    #[error("unknown procedure `{0}`")]
    MethodNotFound(String),
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error("{message}")]
    Conflict { message: String },
    #[error("storage is temporarily unavailable")]
    Unavailable,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProcedureError {
    pub fn code(&self) -> RpcErrorCode {
        match self {
            Self::BadRequest { .. } => RpcErrorCode::BadRequest,
            Self::MethodNotFound(_) => RpcErrorCode::MethodNotFound,
            Self::Validation(_) => RpcErrorCode::Validation,
            Self::Conflict { .. } => RpcErrorCode::Conflict,
            Self::Unavailable => RpcErrorCode::Unavailable,
            Self::Internal(_) => RpcErrorCode::Internal,
        }
    }

    pub fn into_body(self) -> RpcErrorBody {
        let code = self.code();
        match self {
            Self::Validation(errors) => {
                RpcErrorBody::new(code, "Validation failed").with_fields(errors.into_fields())
            }
            // Storage details stay in the logs.
            Self::Internal(_) => RpcErrorBody::new(code, "Internal server error"),
            other => RpcErrorBody::new(code, other.to_string()),
        }
    }
}

impl From<RepoError> for ProcedureError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::Duplicate { constraint } => Self::Conflict {
                message: duplicate_message(&constraint),
            },
            RepoError::InvalidInput { message } | RepoError::Integrity { message } => {
                Self::Conflict { message }
            }
            RepoError::Timeout => Self::Unavailable,
            RepoError::NotFound => Self::Internal("record vanished during the call".to_string()),
            RepoError::Persistence(message) => Self::Internal(message),
        }
    }
}

impl From<CategoryError> for ProcedureError {
    fn from(error: CategoryError) -> Self {
        match error {
            CategoryError::Validation(errors) => Self::Validation(errors),
            CategoryError::Repo(err) => err.into(),
        }
    }
}

impl From<PostError> for ProcedureError {
    fn from(error: PostError) -> Self {
        match error {
            PostError::Validation(errors) => Self::Validation(errors),
            PostError::Repo(err) => err.into(),
        }
    }
}

fn duplicate_message(constraint: &str) -> String {
    if constraint.contains("slug") {
        format!("An entry with the same slug already exists ({constraint})")
    } else {
        format!("Duplicate record violates `{constraint}`")
    }
}

#[derive(Clone)]
pub struct ProcedureRouter {
    categories: CategoryService,
    posts: PostService,
}

impl ProcedureRouter {
    pub fn new(categories: CategoryService, posts: PostService) -> Self {
        Self { categories, posts }
    }

    /// Runs one call. Failures become an error body; this never fails itself.
    pub async fn handle(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest { id, method, params } = request;
        let label = method_label(&method);
        let started = Instant::now();

        let outcome = self.dispatch(&method, params).await;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("quire_rpc_call_ms", "method" => label).record(elapsed_ms);

        match outcome {
            Ok(result) => {
                counter!("quire_rpc_calls_total", "method" => label, "outcome" => "ok")
                    .increment(1);
                debug!(target: "quire::rpc", id, method = label, elapsed_ms, "procedure completed");
                RpcResponse::success(id, result)
            }
            Err(err) => {
                let code = err.code();
                counter!(
                    "quire_rpc_calls_total",
                    "method" => label,
                    "outcome" => code.as_str()
                )
                .increment(1);
                match code {
                    RpcErrorCode::Internal | RpcErrorCode::Unavailable => error!(
                        target: "quire::rpc",
                        id,
                        method = %method,
                        code = %code,
                        error = %err,
                        "procedure failed"
                    ),
                    _ => warn!(
                        target: "quire::rpc",
                        id,
                        method = %method,
                        code = %code,
                        error = %err,
                        "procedure rejected"
                    ),
                }
                RpcResponse::failure(id, err.into_body())
            }
        }
    }

    /// Runs a batch concurrently; responses keep the request order.
    pub async fn handle_batch(&self, requests: Vec<RpcRequest>) -> Vec<RpcResponse> {
        join_all(requests.into_iter().map(|request| self.handle(request))).await
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, ProcedureError> {
        let category_service = &self.categories;
        let post_service = &self.posts;

        match method {
            methods::CATEGORIES_CREATE => {
                encode(categories::create(category_service, decode(method, params)?).await?)
            }
            methods::CATEGORIES_GET_ALL => encode(categories::get_all(category_service).await?),
            methods::CATEGORIES_COUNT => encode(categories::count(category_service).await?),
            methods::CATEGORIES_GET_BY_SLUG => {
                encode(categories::get_by_slug(category_service, decode(method, params)?).await?)
            }
            methods::CATEGORIES_UPDATE => {
                encode(categories::update(category_service, decode(method, params)?).await?)
            }
            methods::CATEGORIES_DELETE => {
                encode(categories::delete(category_service, decode(method, params)?).await?)
            }
            methods::POSTS_CREATE => {
                encode(posts::create(post_service, decode(method, params)?).await?)
            }
            methods::POSTS_GET_ALL => encode(posts::get_all(post_service).await?),
            methods::POSTS_COUNT => encode(posts::count(post_service).await?),
            methods::POSTS_GET_BY_SLUG => {
                encode(posts::get_by_slug(post_service, decode(method, params)?).await?)
            }
            methods::POSTS_GET_BY_CATEGORY => {
                encode(posts::get_by_category(post_service, decode(method, params)?).await?)
            }
            methods::POSTS_UPDATE => {
                encode(posts::update(post_service, decode(method, params)?).await?)
            }
            methods::POSTS_DELETE => {
                encode(posts::delete(post_service, decode(method, params)?).await?)
            }
            other => Err(ProcedureError::MethodNotFound(other.to_string())),
        }
    }
}

fn decode<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, ProcedureError> {
    serde_json::from_value(params).map_err(|err| ProcedureError::BadRequest {
        method: method.to_string(),
        message: err.to_string(),
    })
}

fn encode<T: Serialize>(value: T) -> Result<Value, ProcedureError> {
    serde_json::to_value(value).map_err(|err| ProcedureError::Internal(err.to_string()))
}

/// Known method names become metric labels; anything else is `unknown`.
fn method_label(method: &str) -> &'static str {
    methods::ALL
        .iter()
        .copied()
        .find(|known| *known == method)
        .unwrap_or("unknown")
}
