use crate::opts::ConfigArgs;
use clap::Parser;
use eyre::Result;
use multichain_authorize::Capabilities;
use serde_json::{Value, json};

/// CLI arguments for `multichain registry`.
#[derive(Clone, Debug, Parser)]
pub struct RegistryArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl RegistryArgs {
    pub fn run(self) -> Result<()> {
        let capabilities = Capabilities::from_config(&self.config.load_config()?)?;
        println!("{}", serde_json::to_string_pretty(&registry_json(&capabilities))?);
        Ok(())
    }
}

/// Renders the registries as `{ namespaces, methods, notifications }`, with the supported
/// references listed under each namespace.
pub fn registry_json(capabilities: &Capabilities) -> Value {
    let namespaces: serde_json::Map<_, _> = capabilities
        .namespaces()
        .map(|namespace| {
            let references: Vec<_> = capabilities.references(namespace).collect();
            (namespace.to_string(), json!({ "references": references }))
        })
        .collect();
    let notifications: Vec<_> = capabilities.notifications().collect();
    json!({
        "namespaces": namespaces,
        "methods": capabilities.methods(),
        "notifications": notifications,
    })
}
