use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    application::{error::HttpError, site::IndexQuery},
    presentation::views::{
        IndexTemplate, IndexView, LayoutContext, PostDetailView, PostTemplate,
        render_not_found_response, render_template_response,
    },
};

use super::{HttpState, db_health_response};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct IndexParams {
    q: Option<String>,
    category: Option<String>,
    page: Option<String>,
}

impl From<IndexParams> for IndexQuery {
    fn from(params: IndexParams) -> Self {
        Self {
            search: params.q,
            category: params.category,
            // Unparseable page numbers fall back to the first page.
            page: params.page.and_then(|page| page.trim().parse().ok()),
        }
    }
}

pub(super) async fn index(
    State(state): State<HttpState>,
    Query(params): Query<IndexParams>,
) -> Response {
    match state.site.index(params.into()).await {
        Ok(content) => {
            let view = LayoutContext::new(state.chrome.clone(), IndexView::from(content));
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(super) async fn post_detail(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Response {
    match state.site.post(&slug).await {
        Ok(Some(detail)) => {
            let view = LayoutContext::new(state.chrome.clone(), PostDetailView::from(detail));
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(state.chrome.clone()),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(super) async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.clone())
}

pub(super) async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}
