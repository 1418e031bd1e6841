//! The `multichain` CLI: negotiates CAIP-25 multichain sessions.

fn main() {
    if let Err(err) = multichain_cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
