//! # multichain-config
//!
//! Wallet capability registries and authorization policy.
//!
//! Values are layered with [`figment`]: built-in defaults, then `multichain.toml`, then
//! `MULTICHAIN_`-prefixed environment variables.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_chains::{Chain, NamedChain};
use figment::{
    Figment, Provider,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub mod error;
pub use error::{ExtractConfigError, RegistryError};

pub mod methods;
pub use methods::{DEFAULT_NOTIFICATIONS, DEFAULT_RPC_METHODS, read_openrpc_methods};

// reexport so hosts can merge their own providers
pub use figment;

/// The namespace whose references are EVM chain ids.
pub const EIP155_NAMESPACE: &str = "eip155";

/// The namespace for wallet-level methods that are not bound to a chain.
pub const WALLET_NAMESPACE: &str = "wallet";

/// Which requested session properties the wallet echoes back in a granted session.
///
/// The choice never depends on the request itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPropertiesPolicy {
    /// Honor no session properties.
    #[default]
    None,
    /// Honor every requested session property.
    All,
}

/// Authorization configuration
///
/// # Defaults
///
/// The default registries support the `eip155` and `wallet` namespaces, a fixed set of EVM
/// chains, the [`DEFAULT_RPC_METHODS`] and the [`DEFAULT_NOTIFICATIONS`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizeConfig {
    /// Namespaces that may be requested, with or without a reference.
    pub namespaces: Vec<String>,
    /// EVM chains that may be requested as `eip155:<chain id>`.
    ///
    /// Accepts chain ids as well as chain names, e.g. `[1, "optimism"]`.
    pub chains: Vec<Chain>,
    /// Additional supported references keyed by namespace.
    pub references: BTreeMap<String, Vec<String>>,
    /// Notifications the wallet can emit.
    pub notifications: Vec<String>,
    /// Supported RPC methods, ignored if `openrpc_document` is set.
    pub methods: Vec<String>,
    /// OpenRPC document to read the supported RPC methods from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrpc_document: Option<PathBuf>,
    /// Session properties policy.
    pub session_properties: SessionPropertiesPolicy,
}

impl Default for AuthorizeConfig {
    fn default() -> Self {
        Self {
            namespaces: vec![EIP155_NAMESPACE.to_string(), WALLET_NAMESPACE.to_string()],
            chains: [
                NamedChain::Mainnet,
                NamedChain::Optimism,
                NamedChain::BinanceSmartChain,
                NamedChain::Polygon,
                NamedChain::Base,
                NamedChain::Arbitrum,
                NamedChain::Linea,
                NamedChain::Sepolia,
            ]
            .into_iter()
            .map(Chain::from_named)
            .collect(),
            references: BTreeMap::new(),
            notifications: DEFAULT_NOTIFICATIONS.iter().map(|s| s.to_string()).collect(),
            methods: DEFAULT_RPC_METHODS.iter().map(|s| s.to_string()).collect(),
            openrpc_document: None,
            session_properties: SessionPropertiesPolicy::default(),
        }
    }
}

impl AuthorizeConfig {
    /// The default config file name
    pub const FILE_NAME: &'static str = "multichain.toml";

    /// The prefix of all environment variables that override config values
    pub const ENV_PREFIX: &'static str = "MULTICHAIN_";

    /// Returns the `AuthorizeConfig` for the current working directory.
    ///
    /// See [`figment`](Self::figment) for more details.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Returns the `AuthorizeConfig` with `root` as the directory holding [`Self::FILE_NAME`].
    pub fn load_with_root(root: impl AsRef<Path>) -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment_with_root(root))
    }

    /// Returns the `AuthorizeConfig` read from the given config file.
    pub fn load_with_file(file: impl AsRef<Path>) -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment_with_file(file))
    }

    /// Attempts to extract an `AuthorizeConfig` from `provider`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use multichain_config::{
    ///     AuthorizeConfig,
    ///     figment::providers::{Format, Toml},
    /// };
    ///
    /// let figment = AuthorizeConfig::figment().merge(Toml::string("notifications = []"));
    /// let config = AuthorizeConfig::try_from(figment).unwrap();
    /// assert!(config.notifications.is_empty());
    /// ```
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::new)
    }

    /// The default figment, rooted at the current working directory.
    ///
    /// Merges, in order of increasing precedence:
    /// - the [`Default`] values
    /// - `multichain.toml`, if present
    /// - `MULTICHAIN_` environment variables, e.g. `MULTICHAIN_SESSION_PROPERTIES=all`
    pub fn figment() -> Figment {
        Self::figment_with_root(".")
    }

    /// The default figment, reading [`Self::FILE_NAME`] from `root`.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        Self::figment_with_file(root.as_ref().join(Self::FILE_NAME))
    }

    /// The default figment, reading the config file at `file`.
    pub fn figment_with_file(file: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Supported `eip155` references, the decimal chain ids of [`Self::chains`].
    pub fn eip155_references(&self) -> impl Iterator<Item = String> + '_ {
        self.chains.iter().map(|chain| chain.id().to_string())
    }

    /// Returns the supported RPC method names.
    ///
    /// If an OpenRPC document is configured it is the single source of method names.
    pub fn rpc_methods(&self) -> Result<Vec<String>, RegistryError> {
        match &self.openrpc_document {
            Some(path) => {
                debug!(
                    target: "config",
                    path = %path.display(),
                    "reading methods from OpenRPC document"
                );
                read_openrpc_methods(path)
            }
            None => Ok(self.methods.clone()),
        }
    }
}
