//! Client side of the procedure endpoint.
//!
//! [`RpcClient`] issues typed calls over an [`RpcTransport`]; the stores in
//! [`store`] keep the last fetched lists together with loading and error
//! state, re-fetching after every successful mutation.

pub mod error;
pub mod normalize;
pub mod rpc;
pub mod store;
pub mod transport;

pub use error::ClientError;
pub use normalize::{ApiCategory, ApiPost, ApiPostCategoryLink, normalize_category, normalize_post};
pub use rpc::RpcClient;
pub use store::{CategoriesState, CategoriesStore, PostsState, PostsStore};
pub use transport::{HttpTransport, InProcessTransport, RpcTransport};
