//! Wallet capability registries and the checks run against them.

use crate::{
    error::AuthorizeError,
    scope::{ScopeObject, ScopeString, is_valid_namespace, is_valid_reference},
};
use multichain_config::{AuthorizeConfig, EIP155_NAMESPACE, RegistryError};
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt,
    sync::Arc,
};

/// Errors raised while building [`Capabilities`].
#[derive(Debug, thiserror::Error)]
pub enum CapabilitiesError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("invalid namespace `{0}`")]
    InvalidNamespace(String),
    #[error("invalid reference `{reference}` for namespace `{namespace}`")]
    InvalidReference { namespace: String, reference: String },
}

/// Immutable registries of what the wallet supports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    namespaces: BTreeSet<String>,
    references: BTreeMap<String, BTreeSet<String>>,
    methods: Vec<String>,
    method_set: HashSet<String>,
    notifications: BTreeSet<String>,
}

impl Capabilities {
    /// Builds the registries described by `config`.
    ///
    /// This reads the OpenRPC document if one is configured.
    pub fn from_config(config: &AuthorizeConfig) -> Result<Self, CapabilitiesError> {
        let mut capabilities = Self::default()
            .with_methods(config.rpc_methods()?)
            .with_notifications(config.notifications.iter().cloned());

        for namespace in &config.namespaces {
            capabilities = capabilities.with_namespace(namespace)?;
        }
        for reference in config.eip155_references() {
            capabilities = capabilities.with_reference(EIP155_NAMESPACE, reference)?;
        }
        for (namespace, references) in &config.references {
            for reference in references {
                capabilities = capabilities.with_reference(namespace, reference)?;
            }
        }

        debug!(
            target: "authorize",
            namespaces = ?capabilities.namespaces,
            methods = capabilities.methods.len(),
            notifications = ?capabilities.notifications,
            "built capability registries"
        );
        Ok(capabilities)
    }

    /// Adds a supported namespace.
    pub fn with_namespace(
        mut self,
        namespace: impl Into<String>,
    ) -> Result<Self, CapabilitiesError> {
        let namespace = namespace.into();
        if !is_valid_namespace(&namespace) {
            return Err(CapabilitiesError::InvalidNamespace(namespace));
        }
        self.namespaces.insert(namespace);
        Ok(self)
    }

    /// Adds a supported reference within `namespace`.
    ///
    /// The reference is only usable if the namespace itself is supported.
    pub fn with_reference(
        mut self,
        namespace: impl Into<String>,
        reference: impl Into<String>,
    ) -> Result<Self, CapabilitiesError> {
        let (namespace, reference) = (namespace.into(), reference.into());
        if !is_valid_namespace(&namespace) || !is_valid_reference(&reference) {
            return Err(CapabilitiesError::InvalidReference { namespace, reference });
        }
        self.references.entry(namespace).or_default().insert(reference);
        Ok(self)
    }

    /// Appends supported methods, keeping registry order.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for method in methods {
            let method = method.into();
            if self.method_set.insert(method.clone()) {
                self.methods.push(method);
            }
        }
        self
    }

    /// Adds supported notifications.
    pub fn with_notifications<I, S>(mut self, notifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notifications.extend(notifications.into_iter().map(Into::into));
        self
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    pub fn references(&self, namespace: &str) -> impl Iterator<Item = &str> {
        self.references.get(namespace).into_iter().flatten().map(String::as_str)
    }

    /// Supported methods in registry order.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn notifications(&self) -> impl Iterator<Item = &str> {
        self.notifications.iter().map(String::as_str)
    }
}

/// Decides whether a supported chain can currently be served, e.g. whether a network client
/// exists for it.
pub trait ChainAvailability: Send + Sync {
    fn is_available(&self, scope: &ScopeString) -> bool;
}

impl<F> ChainAvailability for F
where
    F: Fn(&ScopeString) -> bool + Send + Sync,
{
    fn is_available(&self, scope: &ScopeString) -> bool {
        self(scope)
    }
}

/// Answers capability questions against [`Capabilities`].
#[derive(Clone)]
pub struct SupportChecker {
    capabilities: Arc<Capabilities>,
    availability: Option<Arc<dyn ChainAvailability>>,
}

impl fmt::Debug for SupportChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupportChecker")
            .field("capabilities", &self.capabilities)
            .field("availability", &self.availability.is_some())
            .finish()
    }
}

impl SupportChecker {
    pub fn new(capabilities: impl Into<Arc<Capabilities>>) -> Self {
        Self { capabilities: capabilities.into(), availability: None }
    }

    /// Additionally requires chain scopes to pass `availability`.
    pub fn with_chain_availability(
        mut self,
        availability: impl ChainAvailability + 'static,
    ) -> Self {
        self.availability = Some(Arc::new(availability));
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns `true` if the wallet supports the namespace, and the chain if one is referenced.
    pub fn is_supported_scope_string(&self, scope: &ScopeString) -> bool {
        if !self.capabilities.namespaces.contains(scope.namespace()) {
            return false;
        }
        let Some(reference) = scope.reference() else { return true };
        let known = self
            .capabilities
            .references
            .get(scope.namespace())
            .is_some_and(|references| references.contains(reference));
        known && self.availability.as_ref().is_none_or(|check| check.is_available(scope))
    }

    pub fn is_supported_method(&self, method: &str) -> bool {
        self.capabilities.method_set.contains(method)
    }

    pub fn is_supported_notification(&self, notification: &str) -> bool {
        self.capabilities.notifications.contains(notification)
    }

    /// Checks a validated scope entry, in order: chains, methods, notifications.
    ///
    /// The chains of a namespace-wide scope must all be supported as well.
    pub fn check_scope(
        &self,
        scope: &ScopeString,
        object: &ScopeObject,
    ) -> Result<(), AuthorizeError> {
        if let Some(unsupported) = std::iter::once(scope)
            .chain(object.scopes.iter().flatten())
            .find(|scope| !self.is_supported_scope_string(scope))
        {
            return Err(AuthorizeError::UnsupportedScope(unsupported.clone()));
        }

        if let Some(method) =
            object.methods.iter().find(|method| !self.is_supported_method(method))
        {
            return Err(AuthorizeError::UnsupportedMethod {
                scope: scope.clone(),
                method: method.clone(),
            });
        }

        if let Some(notification) = object
            .notifications
            .iter()
            .flatten()
            .find(|notification| !self.is_supported_notification(notification))
        {
            return Err(AuthorizeError::UnsupportedNotification {
                scope: scope.clone(),
                notification: notification.clone(),
            });
        }

        Ok(())
    }
}
