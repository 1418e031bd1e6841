use crate::utils::{ORIGIN, assert_rejected, authorize, negotiator};
use multichain_authorize::{
    AuthorizeError, Caip25CaveatValue, InMemoryPermissionStore, ScopeObject, ScopeString,
    ScopesMap, SessionNegotiator, SupportChecker,
};
use serde_json::json;
use similar_asserts::assert_eq;

fn scope(s: &str) -> ScopeString {
    s.parse().unwrap()
}

#[test]
fn grants_required_scope() {
    let (negotiator, store) = negotiator();
    let session = authorize(
        &negotiator,
        json!({ "requiredScopes": { "eip155:1": { "methods": ["personal_sign"] } } }),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&session.session_scopes).unwrap(),
        json!({ "eip155:1": { "methods": ["personal_sign"], "accounts": [] } })
    );
    assert!(session.session_properties.is_empty());
    assert!(uuid_like(&session.session_id));
    assert_eq!(store.origins(), [ORIGIN]);
}

#[test]
fn empty_request_is_rejected() {
    let (negotiator, store) = negotiator();
    assert_rejected(authorize(&negotiator, json!([{}, {}])), 5000);
    assert_rejected(authorize(&negotiator, json!([])), 5000);
    assert!(store.origins().is_empty());
}

#[test]
fn optional_scope_wins_on_collision() {
    let (negotiator, store) = negotiator();
    let session = authorize(
        &negotiator,
        json!([
            { "eip155:1": { "methods": ["a"] } },
            { "eip155:1": { "methods": ["b"] } },
        ]),
    )
    .unwrap();

    assert_eq!(session.session_scopes.len(), 1);
    assert_eq!(session.session_scopes[&scope("eip155:1")].methods, ["b"]);

    // the caveat keeps both maps as they were validated
    let caveat = store.caip25_caveat(ORIGIN).unwrap();
    assert_eq!(
        caveat,
        Caip25CaveatValue {
            required_scopes: ScopesMap::from([(
                scope("eip155:1"),
                ScopeObject::with_methods(["a"])
            )]),
            optional_scopes: ScopesMap::from([(
                scope("eip155:1"),
                ScopeObject::with_methods(["b"])
            )]),
        }
    );
}

#[test]
fn unsupported_chain_is_rejected() {
    let (negotiator, store) = negotiator();
    assert_rejected(
        authorize(&negotiator, json!([{ "cosmos:1": { "methods": [] } }])),
        5100,
    );
    assert_rejected(
        authorize(&negotiator, json!([{ "eip155:10": { "methods": [] } }])),
        5100,
    );
    assert!(store.origins().is_empty());
}

#[test]
fn unsupported_chain_of_namespace_scope_is_rejected() {
    let (negotiator, _) = negotiator();
    let err = authorize(
        &negotiator,
        json!([{ "eip155": { "scopes": ["eip155:1", "eip155:5"], "methods": ["a"] } }]),
    )
    .unwrap_err();
    assert!(matches!(err, AuthorizeError::UnsupportedScope(s) if s == scope("eip155:5")));

    let session = authorize(
        &negotiator,
        json!([{ "eip155": { "scopes": ["eip155:1", "eip155:137"], "methods": ["a"] } }]),
    )
    .unwrap();
    assert_eq!(
        session.session_scopes[&scope("eip155")].scopes,
        Some(vec![scope("eip155:1"), scope("eip155:137")])
    );
}

#[test]
fn unsupported_method_is_rejected() {
    let (negotiator, _) = negotiator();
    assert_rejected(
        authorize(&negotiator, json!([{ "eip155:1": { "methods": ["eth_doesNotExist"] } }])),
        5101,
    );
}

#[test]
fn unsupported_notification_is_rejected() {
    let (negotiator, _) = negotiator();
    assert_rejected(
        authorize(
            &negotiator,
            json!([{ "eip155:1": { "methods": ["a"], "notifications": ["message"] } }]),
        ),
        5102,
    );
}

#[test]
fn chain_is_checked_before_methods() {
    let (negotiator, _) = negotiator();
    assert_rejected(
        authorize(&negotiator, json!([{ "cosmos:1": { "methods": ["eth_doesNotExist"] } }])),
        5100,
    );
}

#[test]
fn entries_are_checked_in_scope_string_order() {
    let (negotiator, _) = negotiator();
    // `abcd:1` sorts first, so its unsupported chain is reported over the later bad method
    assert_rejected(
        authorize(
            &negotiator,
            json!([{ "eip155:1": { "methods": ["nope"] }, "abcd:1": { "methods": ["a"] } }]),
        ),
        5100,
    );
}

#[test]
fn unavailable_chain_is_rejected() {
    let (negotiator, _) = negotiator();
    let checker = negotiator
        .checker()
        .clone()
        .with_chain_availability(|scope: &ScopeString| scope.reference() != Some("137"));
    let negotiator = SessionNegotiator::new(checker, InMemoryPermissionStore::new());

    assert!(authorize(&negotiator, json!([{ "eip155:1": { "methods": ["a"] } }])).is_ok());
    assert_rejected(authorize(&negotiator, json!([{ "eip155:137": { "methods": ["a"] } }])), 5100);
}

#[test]
fn repeated_requests_yield_distinct_sessions() {
    let (negotiator, store) = negotiator();
    let params = json!({
        "requiredScopes": { "eip155:1": { "methods": ["a"] } },
        "optionalScopes": {
            "eip155:137": { "methods": ["eth_chainId"], "notifications": ["chainChanged"] },
        },
    });

    let first = authorize(&negotiator, params.clone()).unwrap();
    let second = authorize(&negotiator, params).unwrap();

    assert_eq!(first.session_scopes, second.session_scopes);
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(store.origins(), [ORIGIN]);
}

#[test]
fn every_granted_scope_has_accounts() {
    let (negotiator, _) = negotiator();
    let session = authorize(
        &negotiator,
        json!([
            { "eip155:1": { "methods": ["a"] } },
            { "wallet": { "methods": ["wallet_getPermissions"], "accounts": [] } },
        ]),
    )
    .unwrap();

    let scopes = serde_json::to_value(&session.session_scopes).unwrap();
    for (scope, object) in scopes.as_object().unwrap() {
        assert_eq!(object["accounts"], json!([]), "missing accounts for {scope}");
    }
}

#[test]
fn empty_session_properties_are_rejected() {
    let (negotiator, _) = negotiator();
    assert_rejected(
        authorize(&negotiator, json!([{ "eip155:1": { "methods": ["a"] } }, {}, {}])),
        5300,
    );
}

#[test]
fn exhausted_scope_map_is_rejected() {
    let (negotiator, store) = negotiator();

    // every required entry is malformed, the valid optional one does not help
    let err = authorize(
        &negotiator,
        json!([
            { "eip155:1:2": { "methods": [] }, "eip155:1": { "methods": "a" } },
            { "eip155:1": { "methods": ["a"] } },
        ]),
    )
    .unwrap_err();
    assert!(matches!(err, AuthorizeError::NoValidScopes(_)));
    assert_eq!(err.to_rpc_error().code.code(), 5000);
    assert_eq!(err.to_rpc_error().data, None);
    assert!(store.origins().is_empty());
}

#[test]
fn malformed_entries_are_dropped() {
    let (negotiator, store) = negotiator();
    let session = authorize(
        &negotiator,
        json!({
            "optionalScopes": {
                "eip155:1": { "methods": ["a"] },
                "EIP155:1": { "methods": ["a"] },
                "eip155:137": { "methods": ["a"], "unknown": true },
                "eip155": { "scopes": ["wallet:1"], "methods": [] },
            }
        }),
    )
    .unwrap();

    assert_eq!(session.session_scopes.keys().collect::<Vec<_>>(), [&scope("eip155:1")]);
    assert_eq!(store.caip25_caveat(ORIGIN).unwrap().optional_scopes, session.session_scopes);
}

#[test]
fn chain_scope_with_malformed_nested_scopes_is_granted() {
    let (negotiator, _) = negotiator();
    let session = authorize(
        &negotiator,
        json!({ "requiredScopes": { "eip155:1": { "methods": ["a"], "scopes": "garbage" } } }),
    )
    .unwrap();
    assert_eq!(session.session_scopes[&scope("eip155:1")], ScopeObject::with_methods(["a"]));
}

#[test]
fn extra_params_are_rejected_first() {
    let (negotiator, _) = negotiator();
    assert_rejected(authorize(&negotiator, json!([[], "x", 1, {}])), 5301);
    assert_rejected(authorize(&negotiator, json!({ "requiredScopes": 1, "chains": {} })), 5301);
}

#[test]
fn non_object_params_are_invalid() {
    let (negotiator, _) = negotiator();
    assert_rejected(authorize(&negotiator, json!([{}, "eip155:1"])), -32602);
}

#[test]
fn negotiator_from_default_config() {
    let store = InMemoryPermissionStore::new();
    let negotiator =
        SessionNegotiator::from_config(&multichain_config::AuthorizeConfig::default(), store)
            .unwrap();
    let checker: &SupportChecker = negotiator.checker();

    assert!(checker.is_supported_scope_string(&scope("eip155:1")));
    assert!(checker.is_supported_scope_string(&scope("eip155:8453")));
    assert!(checker.is_supported_scope_string(&scope("wallet")));
    assert!(!checker.is_supported_scope_string(&scope("eip155:999999")));
    assert!(checker.is_supported_method("eth_sendTransaction"));
    assert!(checker.is_supported_notification("accountsChanged"));

    let session = authorize(
        &negotiator,
        json!({ "optionalScopes": { "eip155:10": { "methods": ["eth_chainId"] } } }),
    )
    .unwrap();
    assert!(session.session_scopes.contains_key(&scope("eip155:10")));
}

fn uuid_like(id: &str) -> bool {
    let groups: Vec<_> = id.split('-').map(str::len).collect();
    groups == [8, 4, 4, 4, 12] && id.chars().nth(14) == Some('4')
}
