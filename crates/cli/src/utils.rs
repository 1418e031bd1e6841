use eyre::{Result, WrapErr};
use std::{io::Read, path::Path};
use tracing_subscriber::EnvFilter;

/// Initializes a tracing subscriber writing to stderr, filtered by `RUST_LOG`.
pub fn subscriber() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Creates a new multi-threaded tokio runtime.
pub fn tokio_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create tokio runtime")
}

/// Reads the contents of `path`, or stdin if no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input).wrap_err("failed to read stdin")?;
            Ok(input)
        }
    }
}
