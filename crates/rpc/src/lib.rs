//! JSON-RPC 2.0 wire types shared by the authorization handler and its transports.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// JSON-RPC request bindings
pub mod request;

/// JSON-RPC response bindings
pub mod response;

/// JSON-RPC error bindings
pub mod error;
