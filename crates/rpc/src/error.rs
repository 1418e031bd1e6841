//! JSON-RPC error bindings
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{borrow::Cow, fmt};

/// Represents a JSON-RPC error
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpcError {
    pub code: ErrorCode,
    /// error message
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// New [`RpcError`] with the given [`ErrorCode`].
    pub const fn new(code: ErrorCode) -> Self {
        Self { message: Cow::Borrowed(code.message()), code, data: None }
    }

    /// Attaches additional `data` to the error.
    pub fn with_data(mut self, data: impl Into<serde_json::Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Creates a new `ParseError` error.
    pub const fn parse_error() -> Self {
        Self::new(ErrorCode::ParseError)
    }

    /// Creates a new `MethodNotFound` error.
    pub const fn method_not_found() -> Self {
        Self::new(ErrorCode::MethodNotFound)
    }

    /// Creates a new `InvalidRequest` error.
    pub const fn invalid_request() -> Self {
        Self::new(ErrorCode::InvalidRequest)
    }

    /// Creates a new `InternalError` error.
    pub const fn internal_error() -> Self {
        Self::new(ErrorCode::InternalError)
    }

    /// Creates a new `InvalidParams` error.
    pub fn invalid_params<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self { code: ErrorCode::InvalidParams, message: message.into().into(), data: None }
    }

    /// Creates a new `InternalError` error with a message.
    pub fn internal_error_with<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self { code: ErrorCode::InternalError, message: message.into().into(), data: None }
    }

    /// The request could not be served for a reason the wallet does not disclose.
    pub const fn unknown_request() -> Self {
        Self::new(ErrorCode::UnknownRequest)
    }

    /// One or more requested chains or namespaces are not supported.
    pub const fn unsupported_chains() -> Self {
        Self::new(ErrorCode::UnsupportedChains)
    }

    /// One or more requested methods are not supported.
    pub const fn unsupported_methods() -> Self {
        Self::new(ErrorCode::UnsupportedMethods)
    }

    /// One or more requested notifications are not supported.
    pub const fn unsupported_notifications() -> Self {
        Self::new(ErrorCode::UnsupportedNotifications)
    }

    /// Session properties were requested but the map was empty.
    pub const fn invalid_session_properties() -> Self {
        Self::new(ErrorCode::InvalidSessionProperties)
    }

    /// Parameters beyond the known top-level fields were supplied.
    pub const fn unexpected_params() -> Self {
        Self::new(ErrorCode::UnexpectedParams)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.message(), self.message)
    }
}

impl std::error::Error for RpcError {}

/// List of JSON-RPC error codes
///
/// Besides the JSON-RPC 2.0 reserved range this includes the session authorization codes from
/// CAIP-25, see <https://github.com/ChainAgnostic/CAIPs/blob/main/CAIPs/caip-25.md>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// Server received Invalid JSON.
    /// server side error while parsing JSON
    ParseError,
    /// send invalid request object.
    InvalidRequest,
    /// method does not exist or valid
    MethodNotFound,
    /// invalid method parameter.
    InvalidParams,
    /// internal call error
    InternalError,
    /// Generic authorization failure, deliberately opaque to the requester.
    UnknownRequest,
    /// Requested chains are not supported.
    UnsupportedChains,
    /// Requested methods are not supported.
    UnsupportedMethods,
    /// Requested notifications are not supported.
    UnsupportedNotifications,
    /// Requested session properties were empty.
    InvalidSessionProperties,
    /// Unexpected top-level parameters.
    UnexpectedParams,
    /// Used for server specific errors.
    ServerError(i64),
}

impl ErrorCode {
    /// Returns the error code as `i64`
    pub fn code(&self) -> i64 {
        match *self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::UnknownRequest => 5000,
            Self::UnsupportedChains => 5100,
            Self::UnsupportedMethods => 5101,
            Self::UnsupportedNotifications => 5102,
            Self::InvalidSessionProperties => 5300,
            Self::UnexpectedParams => 5301,
            Self::ServerError(c) => c,
        }
    }

    /// Returns the message associated with the error
    pub const fn message(&self) -> &'static str {
        match *self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::UnknownRequest => "Unknown error with request",
            Self::UnsupportedChains => "Requested chains are not supported",
            Self::UnsupportedMethods => "Requested methods are not supported",
            Self::UnsupportedNotifications => "Requested notifications are not supported",
            Self::InvalidSessionProperties => "Invalid Session Properties requested",
            Self::UnexpectedParams => "Session Properties can only be optional and global",
            Self::ServerError(_) => "Server error",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'a> Deserialize<'a> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'a>,
    {
        i64::deserialize(deserializer).map(Into::into)
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            5000 => Self::UnknownRequest,
            5100 => Self::UnsupportedChains,
            5101 => Self::UnsupportedMethods,
            5102 => Self::UnsupportedNotifications,
            5300 => Self::InvalidSessionProperties,
            5301 => Self::UnexpectedParams,
            _ => Self::ServerError(code),
        }
    }
}
