use multichain_authorize::{
    AuthorizationRequest, AuthorizeError, Capabilities, GrantedSession, InMemoryPermissionStore,
    SessionNegotiator, SupportChecker,
};
use serde_json::Value;

pub const ORIGIN: &str = "https://dapp.example";

/// Registries with `eip155:1`, `eip155:137` and a handful of methods.
pub fn capabilities() -> Capabilities {
    Capabilities::default()
        .with_namespace("eip155")
        .unwrap()
        .with_namespace("wallet")
        .unwrap()
        .with_reference("eip155", "1")
        .unwrap()
        .with_reference("eip155", "137")
        .unwrap()
        .with_methods(["a", "b", "eth_chainId", "personal_sign", "wallet_getPermissions"])
        .with_notifications(["accountsChanged", "chainChanged"])
}

pub fn negotiator() -> (SessionNegotiator, InMemoryPermissionStore) {
    crate::init_tracing();
    let store = InMemoryPermissionStore::new();
    (SessionNegotiator::new(SupportChecker::new(capabilities()), store.clone()), store)
}

/// Normalizes and negotiates raw JSON-RPC `params`.
pub fn authorize(
    negotiator: &SessionNegotiator,
    params: Value,
) -> Result<GrantedSession, AuthorizeError> {
    let params = serde_json::from_value(params).expect("valid params");
    negotiator.authorize(ORIGIN, AuthorizationRequest::from_params(params)?)
}

/// Asserts that `result` was rejected with the given wire-level error code.
#[track_caller]
pub fn assert_rejected(result: Result<GrantedSession, AuthorizeError>, code: i64) {
    match result {
        Err(err) => assert_eq!(err.to_rpc_error().code.code(), code, "unexpected error: {err}"),
        Ok(session) => panic!("expected rejection with {code}, got {session:?}"),
    }
}
