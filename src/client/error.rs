use quire_rpc_types::RpcErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The procedure ran and answered with an error body.
    #[error("{0}")]
    Rpc(RpcErrorBody),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("failed to encode params for `{method}`: {source}")]
    Encode {
        method: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to decode result of `{method}`: {source}")]
    Decode {
        method: &'static str,
        source: serde_json::Error,
    },
    #[error("no response for call {0}")]
    MissingResponse(u64),
}
