//! Configuration errors
use figment::providers::{Format, Toml};
use std::{collections::HashSet, error::Error, fmt, path::PathBuf};

/// The message shown when the config could not be extracted from the figment
pub const FAILED_TO_EXTRACT_CONFIG_MSG: &str = "failed to extract multichain config:";

/// Represents a failed attempt to extract `AuthorizeConfig` from a `Figment`
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    /// error thrown when extracting the `AuthorizeConfig`
    pub(crate) error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut unique = HashSet::with_capacity(self.error.count());
        writeln!(f, "{FAILED_TO_EXTRACT_CONFIG_MSG}")?;
        for err in self.error.clone() {
            let from_toml = err
                .metadata
                .as_ref()
                .map(|meta| meta.name.contains(Toml::NAME))
                .unwrap_or_default();
            let mut line = if from_toml {
                format!("multichain.toml error: {err}")
            } else {
                format!("multichain config error: {err}")
            };
            if !err.path.is_empty() {
                // the path will contain the setting name like `["session_properties"]`
                line.push_str(&format!(" for setting `{}`", err.path.join(".")));
            }
            if unique.insert(line.clone()) {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

/// Errors raised while loading the method registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read OpenRPC document {}: {source}", path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid OpenRPC document {}: {source}", path.display())]
    ParseDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
