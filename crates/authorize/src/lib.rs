//! # multichain-authorize
//!
//! Negotiation of multichain sessions following
//! [CAIP-25](https://github.com/ChainAgnostic/CAIPs/blob/main/CAIPs/caip-25.md).
//!
//! A requesting application proposes required and optional scopes, the wallet drops malformed
//! entries, checks the rest against its capability registries and grants a session through the
//! permission system:
//!
//! ```rust
//! use multichain_authorize::{
//!     AuthorizationRequest, InMemoryPermissionStore, SessionNegotiator,
//! };
//! use multichain_config::AuthorizeConfig;
//! use serde_json::json;
//!
//! let store = InMemoryPermissionStore::new();
//! let negotiator = SessionNegotiator::from_config(&AuthorizeConfig::default(), store.clone())?;
//!
//! let params = serde_json::from_value(json!({
//!     "requiredScopes": { "eip155:1": { "methods": ["personal_sign"] } },
//! }))?;
//! let request = AuthorizationRequest::from_params(params)?;
//! let session = negotiator.authorize("https://app.example", request)?;
//!
//! assert_eq!(session.session_scopes.len(), 1);
//! assert!(store.caip25_caveat("https://app.example").is_some());
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::{AuthorizeError, ScopesKind};

pub mod handler;
pub use handler::{AuthorizeHandler, PROVIDER_AUTHORIZE};

pub mod negotiator;
pub use negotiator::{GrantedSession, SessionNegotiator};

pub mod permissions;
pub use permissions::{
    CAIP25_CAVEAT_TYPE, CAIP25_ENDOWMENT_PERMISSION_NAME, Caip25CaveatValue,
    GrantPermissionsRequest, InMemoryPermissionStore, PermissionError, PermissionGranter,
};

pub mod request;
pub use request::AuthorizationRequest;

pub mod scope;
pub use scope::{ScopeObject, ScopeString, ScopesMap, is_valid_scope};

pub mod support;
pub use support::{Capabilities, CapabilitiesError, ChainAvailability, SupportChecker};
