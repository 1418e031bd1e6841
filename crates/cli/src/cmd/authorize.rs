use crate::{opts::ConfigArgs, utils};
use clap::Parser;
use eyre::Result;
use multichain_authorize::{AuthorizeHandler, InMemoryPermissionStore, SessionNegotiator};
use multichain_rpc::{error::RpcError, request::Request, response::Response};
use std::path::PathBuf;

/// CLI arguments for `multichain authorize`.
#[derive(Clone, Debug, Parser)]
pub struct AuthorizeArgs {
    /// Origin of the requesting application.
    #[arg(long, value_name = "ORIGIN")]
    pub origin: String,

    /// File holding the JSON-RPC request.
    ///
    /// Reads from stdin if not set.
    #[arg(long, short, value_name = "PATH")]
    pub request: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl AuthorizeArgs {
    pub fn run(self) -> Result<()> {
        let input = utils::read_input(self.request.as_deref())?;
        if let Some(response) = self.execute(&input)? {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Ok(())
    }

    /// Handles the raw request, returning the response to print, if any.
    pub fn execute(&self, input: &str) -> Result<Option<Response>> {
        let config = self.config.load_config()?;
        let negotiator = SessionNegotiator::from_config(&config, InMemoryPermissionStore::new())?;
        let handler = AuthorizeHandler::new(negotiator);

        let request: Request = match serde_json::from_str(input) {
            Ok(request) => request,
            Err(err) => {
                warn!(target: "rpc", %err, "failed to parse request");
                return Ok(Some(Response::error(RpcError::parse_error())));
            }
        };
        Ok(handler.handle_request(&self.origin, request))
    }
}
