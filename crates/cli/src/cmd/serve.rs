use crate::{opts::ConfigArgs, server};
use clap::Parser;
use eyre::{Result, WrapErr};
use multichain_authorize::{AuthorizeHandler, InMemoryPermissionStore, SessionNegotiator};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;

/// CLI arguments for `multichain serve`.
#[derive(Clone, Debug, Parser)]
pub struct ServeArgs {
    /// Port number to listen on.
    #[arg(long, short, default_value = "8545", value_name = "NUM")]
    pub port: u16,

    /// The host the server will listen on.
    #[arg(long, value_name = "IP_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ServeArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.config.load_config()?;
        let store = InMemoryPermissionStore::new();
        let handler = AuthorizeHandler::new(SessionNegotiator::from_config(&config, store)?);

        let addr = SocketAddr::new(self.host, self.port);
        let listener =
            TcpListener::bind(addr).await.wrap_err_with(|| format!("failed to bind to {addr}"))?;
        info!(target: "server", "listening on http://{}", listener.local_addr()?);

        axum::serve(listener, server::router(handler))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target: "server", %err, "failed to listen for ctrl-c");
    }
    debug!(target: "server", "shutting down");
}
