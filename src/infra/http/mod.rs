//! HTTP surface: the public reading site, the procedure endpoint and health.

mod middleware;
mod public;
mod rpc;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::error::ErrorReport;
use crate::application::procedures::ProcedureRouter;
use crate::application::repos::{RepoError, StoreHealth};
use crate::application::site::SiteService;
use crate::presentation::views::LayoutChrome;

use self::middleware::trace_requests;

pub use quire_rpc_types::RPC_PATH;

#[derive(Clone)]
pub struct HttpState {
    pub site: Arc<SiteService>,
    pub procedures: Arc<ProcedureRouter>,
    pub health: Arc<dyn StoreHealth>,
    pub chrome: LayoutChrome,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(public::index))
        .route("/posts/{slug}", get(public::post_detail))
        .route(RPC_PATH, post(rpc::rpc_endpoint))
        .route("/_health/db", get(public::db_health))
        .fallback(public::not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn(trace_requests))
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error("infra::http::db_health", &err).attach(&mut response);
            response
        }
    }
}
