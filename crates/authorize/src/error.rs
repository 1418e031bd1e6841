use crate::{permissions::PermissionError, scope::ScopeString};
use multichain_rpc::error::RpcError;
use std::fmt;

/// Which of the two requested scope maps an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopesKind {
    Required,
    Optional,
}

impl fmt::Display for ScopesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "requiredScopes",
            Self::Optional => "optionalScopes",
        })
    }
}

/// Reasons a session authorization request is rejected.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizeError {
    #[error("unexpected parameter `{0}`")]
    UnexpectedParams(String),
    #[error("{0}")]
    InvalidParams(String),
    #[error("`{0}` object MUST contain 1 or more `scopeObjects`, if present")]
    NoValidScopes(ScopesKind),
    #[error("`sessionProperties` must not be empty, if present")]
    EmptySessionProperties,
    #[error("no valid scopes were requested")]
    EmptySession,
    #[error("scope `{0}` is not supported")]
    UnsupportedScope(ScopeString),
    #[error("method `{method}` requested for `{scope}` is not supported")]
    UnsupportedMethod { scope: ScopeString, method: String },
    #[error("notification `{notification}` requested for `{scope}` is not supported")]
    UnsupportedNotification { scope: ScopeString, notification: String },
    #[error("failed to grant permissions: {0}")]
    Grant(#[from] PermissionError),
}

impl AuthorizeError {
    /// The wire-level error returned to the requester.
    ///
    /// Apart from malformed parameters, details stay out of the response and only the code and
    /// its standard message are sent.
    pub fn to_rpc_error(&self) -> RpcError {
        match self {
            Self::UnexpectedParams(_) => RpcError::unexpected_params(),
            Self::InvalidParams(msg) => RpcError::invalid_params(msg.clone()),
            Self::NoValidScopes(_) | Self::EmptySession | Self::Grant(_) => {
                RpcError::unknown_request()
            }
            Self::EmptySessionProperties => RpcError::invalid_session_properties(),
            Self::UnsupportedScope(_) => RpcError::unsupported_chains(),
            Self::UnsupportedMethod { .. } => RpcError::unsupported_methods(),
            Self::UnsupportedNotification { .. } => RpcError::unsupported_notifications(),
        }
    }
}

impl From<AuthorizeError> for RpcError {
    fn from(err: AuthorizeError) -> Self {
        err.to_rpc_error()
    }
}
