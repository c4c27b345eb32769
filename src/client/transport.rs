use std::sync::Arc;

use async_trait::async_trait;
use quire_rpc_types::{RPC_PATH, RpcRequest, RpcResponse};
use reqwest::{Client, Url};

use super::error::ClientError;
use crate::application::procedures::ProcedureRouter;

/// Carries a batch of calls to the procedure router and back.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, requests: Vec<RpcRequest>) -> Result<Vec<RpcResponse>, ClientError>;
}

/// Posts batches to a running server's procedure endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(site: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(site)?.join(RPC_PATH)?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn user_agent() -> &'static str {
        concat!("quire-admin/", env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, requests: Vec<RpcRequest>) -> Result<Vec<RpcResponse>, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&requests)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ClientError::Server(format!("status {status} body {text}")));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::Server(format!("failed to parse body: {err}")))
    }
}

/// Hands calls straight to a [`ProcedureRouter`] in the same process.
#[derive(Clone)]
pub struct InProcessTransport {
    router: Arc<ProcedureRouter>,
}

impl InProcessTransport {
    pub fn new(router: Arc<ProcedureRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl RpcTransport for InProcessTransport {
    async fn send(&self, requests: Vec<RpcRequest>) -> Result<Vec<RpcResponse>, ClientError> {
        Ok(self.router.handle_batch(requests).await)
    }
}
