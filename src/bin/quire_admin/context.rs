use std::sync::Arc;

use quire::client::{
    CategoriesStore, ClientError, HttpTransport, PostsStore, RpcClient, RpcTransport,
};
use quire::domain::validation::ValidationErrors;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("server error: {0}")]
    Store(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("failed to render output: {0}")]
    Output(serde_json::Error),
}

pub struct Ctx {
    pub client: Arc<RpcClient>,
    pub posts: PostsStore,
    pub categories: CategoriesStore,
}

impl Ctx {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        let client = Arc::new(RpcClient::new(transport));
        Self {
            posts: PostsStore::new(client.clone()),
            categories: CategoriesStore::new(client.clone()),
            client,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, AdminError> {
        let transport = HttpTransport::new(&cli.site)?;
        Ok(Self::new(Arc::new(transport)))
    }
}

/// Turns a store outcome into a command result.
pub fn check_store(ok: bool, error: Option<String>) -> Result<(), AdminError> {
    match (ok, error) {
        (_, Some(message)) => Err(AdminError::Store(message)),
        (true, None) => Ok(()),
        (false, None) => Err(AdminError::Store("request failed".into())),
    }
}
