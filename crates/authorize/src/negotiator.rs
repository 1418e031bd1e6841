//! The session negotiation state machine.
//!
//! A request moves through `received -> normalized -> validated -> support-checked` and ends
//! either granted or rejected. Every step is a single pass, the first failure rejects the whole
//! request and no partial session is ever granted.

use crate::{
    error::{AuthorizeError, ScopesKind},
    permissions::{Caip25CaveatValue, GrantPermissionsRequest, PermissionGranter},
    request::AuthorizationRequest,
    scope::{ScopesMap, parse_scope},
    support::{Capabilities, CapabilitiesError, SupportChecker},
};
use multichain_config::{AuthorizeConfig, SessionPropertiesPolicy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};
use uuid::Uuid;

/// The result of a successful negotiation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantedSession {
    pub session_id: String,
    pub session_scopes: ScopesMap,
    pub session_properties: Map<String, Value>,
}

/// Negotiates CAIP-25 sessions.
///
/// Holds no state between requests, so a single instance may serve concurrent requests.
#[derive(Clone)]
pub struct SessionNegotiator {
    checker: SupportChecker,
    granter: Arc<dyn PermissionGranter>,
    session_properties: SessionPropertiesPolicy,
}

impl fmt::Debug for SessionNegotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionNegotiator")
            .field("checker", &self.checker)
            .field("session_properties", &self.session_properties)
            .finish_non_exhaustive()
    }
}

impl SessionNegotiator {
    pub fn new(checker: SupportChecker, granter: impl PermissionGranter + 'static) -> Self {
        Self {
            checker,
            granter: Arc::new(granter),
            session_properties: SessionPropertiesPolicy::default(),
        }
    }

    /// Creates a negotiator with the registries and policy of `config`.
    pub fn from_config(
        config: &AuthorizeConfig,
        granter: impl PermissionGranter + 'static,
    ) -> Result<Self, CapabilitiesError> {
        let checker = SupportChecker::new(Capabilities::from_config(config)?);
        Ok(Self::new(checker, granter).with_session_properties(config.session_properties))
    }

    /// Sets which requested session properties are honored.
    pub fn with_session_properties(mut self, policy: SessionPropertiesPolicy) -> Self {
        self.session_properties = policy;
        self
    }

    pub fn checker(&self) -> &SupportChecker {
        &self.checker
    }

    /// Runs the handshake for `origin`, granting the session on success.
    pub fn authorize(
        &self,
        origin: &str,
        request: AuthorizationRequest,
    ) -> Result<GrantedSession, AuthorizeError> {
        trace!(target: "authorize", origin, ?request, "received authorization request");

        let required_scopes = validate_scopes(ScopesKind::Required, request.required_scopes)?;
        let optional_scopes = validate_scopes(ScopesKind::Optional, request.optional_scopes)?;
        let session_properties = self.derive_session_properties(request.session_properties)?;

        // optional scopes win on key collisions
        let session_scopes: ScopesMap = required_scopes
            .iter()
            .chain(&optional_scopes)
            .map(|(scope, object)| (scope.clone(), object.clone()))
            .collect();
        if session_scopes.is_empty() {
            return Err(AuthorizeError::EmptySession);
        }
        trace!(target: "authorize", origin, scopes = session_scopes.len(), "validated scopes");

        for (scope, object) in &session_scopes {
            self.checker.check_scope(scope, object)?;
        }
        trace!(target: "authorize", origin, "all scopes supported");

        let caveat = Caip25CaveatValue { required_scopes, optional_scopes };
        self.granter.grant_permissions(GrantPermissionsRequest::caip25(origin, caveat))?;

        let session = GrantedSession {
            session_id: Uuid::new_v4().to_string(),
            session_scopes,
            session_properties,
        };
        debug!(target: "authorize", origin, session_id = %session.session_id, "granted session");
        Ok(session)
    }

    /// Applies the configured policy, which never looks at the properties themselves.
    fn derive_session_properties(
        &self,
        requested: Option<Map<String, Value>>,
    ) -> Result<Map<String, Value>, AuthorizeError> {
        let Some(requested) = requested else { return Ok(Map::new()) };
        if requested.is_empty() {
            return Err(AuthorizeError::EmptySessionProperties);
        }
        Ok(match self.session_properties {
            SessionPropertiesPolicy::All => requested,
            SessionPropertiesPolicy::None => Map::new(),
        })
    }
}

/// Keeps the well-formed entries of a requested scope map.
///
/// A map that was sent with entries but has none left is an error, an absent or empty map is not.
fn validate_scopes(
    kind: ScopesKind,
    scopes: Option<Map<String, Value>>,
) -> Result<ScopesMap, AuthorizeError> {
    let Some(scopes) = scopes else { return Ok(ScopesMap::new()) };

    let valid: ScopesMap = scopes
        .iter()
        .filter_map(|(scope_string, scope_object)| {
            let parsed = parse_scope(scope_string, scope_object);
            if parsed.is_none() {
                debug!(target: "authorize", %kind, %scope_string, "dropping malformed scope");
            }
            parsed
        })
        .collect();

    if !scopes.is_empty() && valid.is_empty() {
        return Err(AuthorizeError::NoValidScopes(kind));
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{InMemoryPermissionStore, PermissionError};
    use serde_json::json;

    fn negotiator(store: InMemoryPermissionStore) -> SessionNegotiator {
        let capabilities = Capabilities::default()
            .with_namespace("eip155")
            .unwrap()
            .with_reference("eip155", "1")
            .unwrap()
            .with_methods(["a", "b", "personal_sign"])
            .with_notifications(["accountsChanged"]);
        SessionNegotiator::new(SupportChecker::new(capabilities), store)
    }

    fn request(value: Value) -> AuthorizationRequest {
        AuthorizationRequest::from_params(serde_json::from_value(value).unwrap()).unwrap()
    }

    #[test]
    fn absent_and_empty_scope_maps_are_not_exhausted() {
        assert!(validate_scopes(ScopesKind::Required, None).unwrap().is_empty());
        assert!(validate_scopes(ScopesKind::Optional, Some(Map::new())).unwrap().is_empty());
    }

    #[test]
    fn all_invalid_scopes_exhaust_the_map() {
        let scopes = json!({ "eip155:1": {}, "bad::": { "methods": [] } });
        let Value::Object(scopes) = scopes else { unreachable!() };
        assert!(matches!(
            validate_scopes(ScopesKind::Optional, Some(scopes)),
            Err(AuthorizeError::NoValidScopes(ScopesKind::Optional))
        ));
    }

    #[test]
    fn session_properties_policy() {
        let store = InMemoryPermissionStore::new();
        let req = json!([{ "eip155:1": { "methods": ["a"] } }, {}, { "expiry": "tomorrow" }]);

        let session = negotiator(store.clone()).authorize("o", request(req.clone())).unwrap();
        assert!(session.session_properties.is_empty());

        let session = negotiator(store)
            .with_session_properties(SessionPropertiesPolicy::All)
            .authorize("o", request(req))
            .unwrap();
        assert_eq!(session.session_properties["expiry"], "tomorrow");
    }

    #[test]
    fn grant_failure_rejects_request() {
        #[derive(Debug)]
        struct Refuse;

        impl PermissionGranter for Refuse {
            fn grant_permissions(
                &self,
                request: GrantPermissionsRequest,
            ) -> Result<(), PermissionError> {
                Err(PermissionError::Rejected {
                    origin: request.subject.origin,
                    reason: "locked".to_string(),
                })
            }
        }

        let checker = negotiator(InMemoryPermissionStore::new()).checker().clone();
        let negotiator = SessionNegotiator::new(checker, Refuse);
        let err = negotiator
            .authorize("o", request(json!([{ "eip155:1": { "methods": ["a"] } }])))
            .unwrap_err();
        assert!(matches!(err, AuthorizeError::Grant(_)));
        assert_eq!(err.to_rpc_error().code.code(), 5000);
    }
}
