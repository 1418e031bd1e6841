//! Subcommands of the `multichain` CLI.

pub mod authorize;
pub mod registry;
pub mod serve;
