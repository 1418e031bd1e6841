//! Scope strings, scope objects and their shape validation.
//!
//! A scope string is a [CAIP-2](https://github.com/ChainAgnostic/CAIPs/blob/main/CAIPs/caip-2.md)
//! chain id (`eip155:1`) or a bare namespace (`eip155`). Validation here only looks at shape,
//! whether the wallet supports a scope is decided by [`SupportChecker`](crate::SupportChecker).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Scopes keyed by their scope string.
pub type ScopesMap = BTreeMap<ScopeString, ScopeObject>;

/// Length bounds of a CAIP-2 namespace.
const NAMESPACE_LEN: std::ops::RangeInclusive<usize> = 3..=8;

/// Length bounds of a CAIP-2 reference.
const REFERENCE_LEN: std::ops::RangeInclusive<usize> = 1..=32;

/// Returns `true` if `namespace` matches `[-a-z0-9]{3,8}`.
pub fn is_valid_namespace(namespace: &str) -> bool {
    NAMESPACE_LEN.contains(&namespace.len())
        && namespace.bytes().all(|b| b == b'-' || b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Returns `true` if `reference` matches `[-_a-zA-Z0-9]{1,32}`.
pub fn is_valid_reference(reference: &str) -> bool {
    REFERENCE_LEN.contains(&reference.len())
        && reference.bytes().all(|b| b == b'-' || b == b'_' || b.is_ascii_alphanumeric())
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid scope string `{0}`")]
pub struct ScopeStringError(String);

/// A `<namespace>` or `<namespace>:<reference>` scope identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeString {
    namespace: String,
    reference: Option<String>,
}

impl ScopeString {
    /// Creates a namespace-wide scope string.
    pub fn new_namespace(namespace: impl Into<String>) -> Result<Self, ScopeStringError> {
        let namespace = namespace.into();
        if !is_valid_namespace(&namespace) {
            return Err(ScopeStringError(namespace));
        }
        Ok(Self { namespace, reference: None })
    }

    /// Creates a chain scope string.
    pub fn new_chain(
        namespace: impl Into<String>,
        reference: impl Into<String>,
    ) -> Result<Self, ScopeStringError> {
        let (namespace, reference) = (namespace.into(), reference.into());
        if !is_valid_namespace(&namespace) || !is_valid_reference(&reference) {
            return Err(ScopeStringError(format!("{namespace}:{reference}")));
        }
        Ok(Self { namespace, reference: Some(reference) })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Whether this scope names a concrete chain.
    pub fn is_chain(&self) -> bool {
        self.reference.is_some()
    }
}

impl FromStr for ScopeString {
    type Err = ScopeStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let parsed = match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), None, None) => Self::new_namespace(namespace),
            (Some(namespace), Some(reference), None) => Self::new_chain(namespace, reference),
            _ => return Err(ScopeStringError(s.to_string())),
        };
        parsed.map_err(|_| ScopeStringError(s.to_string()))
    }
}

impl fmt::Display for ScopeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.namespace)?;
        if let Some(reference) = &self.reference {
            write!(f, ":{reference}")?;
        }
        Ok(())
    }
}

impl Serialize for ScopeString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScopeString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The capabilities requested for, or granted to, a single scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScopeObject {
    /// Chains a namespace-wide scope applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<ScopeString>>,
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<String>>,
    /// CAIP-10 account ids, empty until accounts are exposed.
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_documents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_endpoints: Option<Vec<String>>,
}

impl ScopeObject {
    /// A scope object requesting `methods` only.
    pub fn with_methods<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { methods: methods.into_iter().map(Into::into).collect(), ..Default::default() }
    }

    /// Sets the requested notifications.
    pub fn notifications<I, S>(mut self, notifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notifications = Some(notifications.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the chains of a namespace-wide scope.
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = ScopeString>) -> Self {
        self.scopes = Some(scopes.into_iter().collect());
        self
    }
}

/// Parses a raw `scope_string => scope_object` entry, returning `None` if either is malformed.
///
/// Unset `accounts` default to an empty list. `scopes` on a chain scope carry no meaning and are
/// ignored, whatever their shape.
pub fn parse_scope(
    scope_string: &str,
    scope_object: &serde_json::Value,
) -> Option<(ScopeString, ScopeObject)> {
    let scope: ScopeString = scope_string.parse().ok()?;
    let serde_json::Value::Object(fields) = scope_object else { return None };

    let object = if scope.is_chain() {
        let mut fields = fields.clone();
        fields.remove("scopes");
        ScopeObject::deserialize(serde_json::Value::Object(fields)).ok()?
    } else {
        ScopeObject::deserialize(scope_object).ok()?
    };

    if let Some(scopes) = &object.scopes {
        let same_namespace =
            |s: &ScopeString| s.is_chain() && s.namespace() == scope.namespace();
        if !scopes.iter().all(same_namespace) {
            return None;
        }
    }

    Some((scope, object))
}

/// Returns `true` if the pair is a well-formed scope entry. Never fails.
pub fn is_valid_scope(scope_string: &str, scope_object: &serde_json::Value) -> bool {
    parse_scope(scope_string, scope_object).is_some()
}
