use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use quire_rpc_types::{RpcErrorBody, RpcErrorCode, RpcPayload, RpcResponse};

use crate::application::error::ErrorReport;

use super::HttpState;

/// `POST /api/rpc`: one call or a batch. Procedure failures travel inside
/// the response body; only an unreadable payload yields a 4xx status.
pub(super) async fn rpc_endpoint(
    State(state): State<HttpState>,
    payload: Result<Json<RpcPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(RpcPayload::Single(request))) => {
            Json(state.procedures.handle(request).await).into_response()
        }
        Ok(Json(RpcPayload::Batch(requests))) => {
            Json(state.procedures.handle_batch(requests).await).into_response()
        }
        Err(rejection) => {
            let status = rejection.status();
            let detail = rejection.body_text();
            let body = RpcErrorBody::new(RpcErrorCode::BadRequest, detail.clone());
            let mut response = (status, Json(RpcResponse::failure(0, body))).into_response();
            ErrorReport::from_message("infra::http::rpc", detail)
                .attach(&mut response);
            response
        }
    }
}
