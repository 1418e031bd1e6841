//! # multichain-cli
//!
//! The `multichain` command line interface.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use crate::opts::{Multichain, MultichainSubcommand};
use clap::Parser;
use eyre::Result;

pub mod cmd;
pub mod opts;
pub mod server;
pub mod utils;

/// Run the `multichain` command line interface.
pub fn run() -> Result<()> {
    setup()?;

    let args = Multichain::parse();
    run_command(args)
}

/// Setup logging and other utilities.
pub fn setup() -> Result<()> {
    utils::subscriber();

    Ok(())
}

/// Run the subcommand.
pub fn run_command(args: Multichain) -> Result<()> {
    match args.cmd {
        MultichainSubcommand::Authorize(cmd) => cmd.run(),
        MultichainSubcommand::Serve(cmd) => utils::tokio_runtime()?.block_on(cmd.run()),
        MultichainSubcommand::Registry(cmd) => cmd.run(),
    }
}
