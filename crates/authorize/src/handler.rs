//! JSON-RPC dispatch for the authorization methods.

use crate::{negotiator::SessionNegotiator, request::AuthorizationRequest};
use multichain_rpc::{
    error::RpcError,
    request::{Request, RpcCall, RpcMethodCall},
    response::{Response, ResponseResult, RpcResponse},
};

/// Method name of the session authorization request.
pub const PROVIDER_AUTHORIZE: &str = "provider_authorize";

/// Serves authorization calls on behalf of requesting origins.
#[derive(Clone, Debug)]
pub struct AuthorizeHandler {
    negotiator: SessionNegotiator,
}

impl AuthorizeHandler {
    pub fn new(negotiator: SessionNegotiator) -> Self {
        Self { negotiator }
    }

    pub fn negotiator(&self) -> &SessionNegotiator {
        &self.negotiator
    }

    /// Handles a JSON-RPC [Request] sent by `origin`.
    ///
    /// Returns `None` if nothing needs to be sent back, i.e. only notifications were received.
    pub fn handle_request(&self, origin: &str, req: Request) -> Option<Response> {
        match req {
            Request::Single(call) => self.handle_call(origin, call).map(Response::Single),
            Request::Batch(calls) => {
                let batch: Vec<_> =
                    calls.into_iter().filter_map(|call| self.handle_call(origin, call)).collect();
                (!batch.is_empty()).then_some(Response::Batch(batch))
            }
        }
    }

    /// handle a single RPC method call
    fn handle_call(&self, origin: &str, call: RpcCall) -> Option<RpcResponse> {
        match call {
            RpcCall::MethodCall(call) => Some(self.on_call(origin, call)),
            RpcCall::Notification(notification) => {
                trace!(target: "rpc", "received rpc notification method={}", notification.method);
                None
            }
            RpcCall::Invalid { id } => {
                trace!(target: "rpc", "invalid rpc call id={}", id);
                Some(RpcResponse::invalid_request(id))
            }
        }
    }

    /// Executes a valid RPC method call
    pub fn on_call(&self, origin: &str, call: RpcMethodCall) -> RpcResponse {
        trace!(target: "rpc", "received method call {:?}", call);
        let RpcMethodCall { method, params, id, .. } = call;

        let result = match method.as_str() {
            PROVIDER_AUTHORIZE => match AuthorizationRequest::from_params(params)
                .and_then(|request| self.negotiator.authorize(origin, request))
            {
                Ok(session) => ResponseResult::success(session),
                Err(err) => {
                    warn!(target: "rpc", origin, %err, "rejected {PROVIDER_AUTHORIZE}");
                    ResponseResult::Error(err.into())
                }
            },
            _ => {
                warn!(target: "rpc", "unknown method `{}`", method);
                RpcError::method_not_found().into()
            }
        };

        RpcResponse::new(id, result)
    }
}
