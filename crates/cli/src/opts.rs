use crate::cmd::{authorize::AuthorizeArgs, registry::RegistryArgs, serve::ServeArgs};
use clap::{Parser, Subcommand};
use eyre::Result;
use multichain_config::{
    AuthorizeConfig,
    figment::{
        self, Metadata, Profile, Provider,
        providers::Serialized,
        value::{Dict, Map},
    },
};
use serde::Serialize;
use std::path::PathBuf;

/// Negotiate CAIP-25 multichain sessions.
#[derive(Debug, Parser)]
#[command(name = "multichain", version, next_display_order = None)]
pub struct Multichain {
    #[command(subcommand)]
    pub cmd: MultichainSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum MultichainSubcommand {
    /// Run a single JSON-RPC request through the authorization handler.
    #[command(visible_alias = "a")]
    Authorize(AuthorizeArgs),

    /// Serve `provider_authorize` over HTTP.
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Print the effective capability registries.
    #[command(visible_alias = "r")]
    Registry(RegistryArgs),
}

/// Options that locate and override the configuration.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Config options")]
pub struct ConfigArgs {
    /// Path to the config file.
    ///
    /// Defaults to `multichain.toml` in the current directory.
    #[arg(long, short, value_name = "PATH")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Which requested session properties are echoed back.
    #[arg(long, value_name = "POLICY", value_parser = ["none", "all"])]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_properties: Option<String>,

    /// Read the supported RPC methods from an OpenRPC document.
    #[arg(long, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrpc_document: Option<PathBuf>,
}

impl Provider for ConfigArgs {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl ConfigArgs {
    /// Loads the config, with the given arguments taking precedence over all other sources.
    pub fn load_config(&self) -> Result<AuthorizeConfig> {
        let figment = match &self.config {
            Some(file) => AuthorizeConfig::figment_with_file(file),
            None => AuthorizeConfig::figment(),
        };
        Ok(AuthorizeConfig::try_from(figment.merge(self.clone()))?)
    }
}
