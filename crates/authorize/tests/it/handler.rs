use crate::utils::{ORIGIN, negotiator};
use multichain_authorize::{AuthorizeHandler, PROVIDER_AUTHORIZE};
use multichain_rpc::{
    request::{Id, Request, RpcMethodCall},
    response::{Response, ResponseResult},
};
use serde_json::{Value, json};
use similar_asserts::assert_eq;

fn handler() -> AuthorizeHandler {
    AuthorizeHandler::new(negotiator().0)
}

fn handle(handler: &AuthorizeHandler, request: Value) -> Option<Value> {
    let request: Request = serde_json::from_value(request).unwrap();
    handler.handle_request(ORIGIN, request).map(|response| serde_json::to_value(response).unwrap())
}

#[test]
fn authorizes_method_call() {
    let handler = handler();
    let response = handle(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": PROVIDER_AUTHORIZE,
            "params": { "requiredScopes": { "eip155:1": { "methods": ["a"] } } },
        }),
    )
    .unwrap();

    assert_eq!(response["id"], 1);
    let result = &response["result"];
    assert!(result["sessionId"].is_string());
    assert_eq!(
        result["sessionScopes"],
        json!({ "eip155:1": { "methods": ["a"], "accounts": [] } })
    );
    assert_eq!(result["sessionProperties"], json!({}));
}

#[test]
fn rejection_carries_code_and_standard_message() {
    let handler = handler();
    let response = handle(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "id": "x",
            "method": PROVIDER_AUTHORIZE,
            "params": [{ "eip155:1": { "methods": ["eth_doesNotExist"] } }],
        }),
    )
    .unwrap();

    assert_eq!(
        response,
        json!({
            "jsonrpc": "2.0",
            "id": "x",
            "error": { "code": 5101, "message": "Requested methods are not supported" },
        })
    );
}

#[test]
fn unexpected_params() {
    let call = RpcMethodCall::new(
        Id::Number(7),
        PROVIDER_AUTHORIZE,
        serde_json::from_value(json!([{}, {}, {}, {}])).unwrap(),
    );
    let response = handler().on_call(ORIGIN, call);
    let err = response.result().as_error().unwrap();
    assert_eq!(err.code.code(), 5301);
    assert_eq!(err.message, "Session Properties can only be optional and global");
    assert_eq!(response.id(), Some(&Id::Number(7)));
}

#[test]
fn unknown_method() {
    let call = RpcMethodCall::new(
        Id::Number(1),
        "wallet_createSession",
        serde_json::from_value(json!([])).unwrap(),
    );
    let response = handler().on_call(ORIGIN, call);
    assert_eq!(response.result().as_error().unwrap().code.code(), -32601);
}

#[test]
fn notifications_get_no_response() {
    let handler = handler();
    let notification = json!({ "jsonrpc": "2.0", "method": PROVIDER_AUTHORIZE, "params": [] });
    assert_eq!(handle(&handler, notification.clone()), None);
    assert_eq!(handle(&handler, json!([notification])), None);
    assert!(handler.negotiator().checker().is_supported_method("a"));
}

#[test]
fn answers_batches_in_order() {
    let handler = handler();
    let request: Request = serde_json::from_value(json!([
        {
            "jsonrpc": "2.0",
            "id": 1,
            "method": PROVIDER_AUTHORIZE,
            "params": [{ "eip155:1": { "methods": ["a"] } }],
        },
        { "jsonrpc": "2.0", "method": PROVIDER_AUTHORIZE, "params": [] },
        {
            "jsonrpc": "2.0",
            "id": 2,
            "method": PROVIDER_AUTHORIZE,
            "params": [{ "cosmos:1": { "methods": [] } }],
        },
        { "id": 3 },
    ]))
    .unwrap();

    let Some(Response::Batch(responses)) = handler.handle_request(ORIGIN, request) else {
        panic!("expected a batch response");
    };
    assert_eq!(responses.len(), 3);

    assert!(matches!(responses[0].result(), ResponseResult::Success(_)));
    assert_eq!(responses[1].result().as_error().unwrap().code.code(), 5100);
    assert_eq!(responses[2].id(), Some(&Id::Number(3)));
    assert_eq!(responses[2].result().as_error().unwrap().code.code(), -32600);
}
