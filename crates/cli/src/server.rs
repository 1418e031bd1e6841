//! HTTP transport for the authorization handler.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::ORIGIN},
    response::{IntoResponse, Response},
    routing::post,
};
use multichain_authorize::AuthorizeHandler;
use multichain_rpc::{error::RpcError, request::Request, response::Response as RpcResponse};

/// Serves JSON-RPC requests with `POST /`.
pub fn router(handler: AuthorizeHandler) -> Router {
    Router::new().route("/", post(handle_rpc)).with_state(handler)
}

/// Handles a JSON-RPC request on behalf of the `Origin` it was sent from.
///
/// Requests without an `Origin` header are rejected as invalid, notifications are acknowledged
/// with an empty `204`.
pub async fn handle_rpc(
    State(handler): State<AuthorizeHandler>,
    headers: HeaderMap,
    request: Result<Json<Request>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(err) => {
            warn!(target: "server", %err, "failed to parse request");
            return Json(RpcResponse::error(RpcError::parse_error())).into_response();
        }
    };

    let Some(origin) = headers.get(ORIGIN).and_then(|origin| origin.to_str().ok()) else {
        warn!(target: "server", "request without origin");
        let error = RpcError::invalid_request().with_data("missing `Origin` header");
        return (StatusCode::BAD_REQUEST, Json(RpcResponse::error(error))).into_response();
    };

    match handler.handle_request(origin, request) {
        Some(response) => Json(response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
