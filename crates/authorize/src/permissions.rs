//! The boundary to the permission system that stores granted sessions.

use crate::scope::ScopesMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// Name of the permission that carries a CAIP-25 session.
pub const CAIP25_ENDOWMENT_PERMISSION_NAME: &str = "endowment:caip25";

/// Type of the caveat holding the authorized scopes.
pub const CAIP25_CAVEAT_TYPE: &str = "authorizedScopes";

/// The authorized scopes, as validated before required and optional were merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caip25CaveatValue {
    pub required_scopes: ScopesMap,
    pub optional_scopes: ScopesMap,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caveat {
    #[serde(rename = "type")]
    pub caveat_type: String,
    pub value: Caip25CaveatValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConstraint {
    pub caveats: Vec<Caveat>,
}

/// The party permissions are granted to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub origin: String,
}

/// Parameters of a `grantPermissions` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionsRequest {
    pub subject: Subject,
    pub approved_permissions: BTreeMap<String, PermissionConstraint>,
}

impl GrantPermissionsRequest {
    /// The CAIP-25 endowment for `origin` with a single `authorizedScopes` caveat.
    pub fn caip25(origin: impl Into<String>, value: Caip25CaveatValue) -> Self {
        let constraint = PermissionConstraint {
            caveats: vec![Caveat { caveat_type: CAIP25_CAVEAT_TYPE.to_string(), value }],
        };
        Self {
            subject: Subject { origin: origin.into() },
            approved_permissions: BTreeMap::from([(
                CAIP25_ENDOWMENT_PERMISSION_NAME.to_string(),
                constraint,
            )]),
        }
    }

    /// Returns the CAIP-25 caveat value, if this request carries one.
    pub fn caip25_caveat(&self) -> Option<&Caip25CaveatValue> {
        self.approved_permissions
            .get(CAIP25_ENDOWMENT_PERMISSION_NAME)?
            .caveats
            .iter()
            .find(|caveat| caveat.caveat_type == CAIP25_CAVEAT_TYPE)
            .map(|caveat| &caveat.value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("permissions for `{origin}` were rejected: {reason}")]
    Rejected { origin: String, reason: String },
}

/// Persists granted permissions.
///
/// Implementations must tolerate concurrent grants for distinct origins.
pub trait PermissionGranter: Send + Sync {
    fn grant_permissions(&self, request: GrantPermissionsRequest) -> Result<(), PermissionError>;
}

/// A [`PermissionGranter`] that keeps the most recent grant per origin in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPermissionStore {
    grants: Arc<Mutex<HashMap<String, GrantPermissionsRequest>>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permissions granted to `origin`.
    pub fn permissions(&self, origin: &str) -> Option<GrantPermissionsRequest> {
        self.grants.lock().get(origin).cloned()
    }

    /// Returns the authorized scopes of `origin`.
    pub fn caip25_caveat(&self, origin: &str) -> Option<Caip25CaveatValue> {
        self.grants.lock().get(origin)?.caip25_caveat().cloned()
    }

    /// Revokes all permissions of `origin`, returning whether any existed.
    pub fn revoke(&self, origin: &str) -> bool {
        self.grants.lock().remove(origin).is_some()
    }

    /// Origins holding permissions, sorted.
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<_> = self.grants.lock().keys().cloned().collect();
        origins.sort();
        origins
    }
}

impl PermissionGranter for InMemoryPermissionStore {
    fn grant_permissions(&self, request: GrantPermissionsRequest) -> Result<(), PermissionError> {
        trace!(target: "permissions", origin = %request.subject.origin, "storing grant");
        self.grants.lock().insert(request.subject.origin.clone(), request);
        Ok(())
    }
}
