//! The RPC method registry.

use crate::error::RegistryError;
use serde::Deserialize;
use std::path::Path;

/// RPC methods the wallet implements when no OpenRPC document is configured.
pub const DEFAULT_RPC_METHODS: &[&str] = &[
    "wallet_addEthereumChain",
    "wallet_switchEthereumChain",
    "wallet_getPermissions",
    "wallet_requestPermissions",
    "wallet_revokePermissions",
    "wallet_registerOnboarding",
    "wallet_watchAsset",
    "wallet_scanQRCode",
    "personal_sign",
    "eth_signTypedData_v4",
    "eth_decrypt",
    "eth_getEncryptionPublicKey",
    "eth_requestAccounts",
    "eth_accounts",
    "eth_blockNumber",
    "eth_call",
    "eth_chainId",
    "eth_coinbase",
    "eth_estimateGas",
    "eth_feeHistory",
    "eth_gasPrice",
    "eth_getBalance",
    "eth_getBlockByHash",
    "eth_getBlockByNumber",
    "eth_getBlockTransactionCountByHash",
    "eth_getBlockTransactionCountByNumber",
    "eth_getCode",
    "eth_getFilterChanges",
    "eth_getFilterLogs",
    "eth_getLogs",
    "eth_getProof",
    "eth_getStorageAt",
    "eth_getTransactionByBlockHashAndIndex",
    "eth_getTransactionByBlockNumberAndIndex",
    "eth_getTransactionByHash",
    "eth_getTransactionCount",
    "eth_getTransactionReceipt",
    "eth_getUncleCountByBlockHash",
    "eth_getUncleCountByBlockNumber",
    "eth_newBlockFilter",
    "eth_newFilter",
    "eth_newPendingTransactionFilter",
    "eth_sendRawTransaction",
    "eth_sendTransaction",
    "eth_subscribe",
    "eth_syncing",
    "eth_uninstallFilter",
    "eth_unsubscribe",
    "web3_clientVersion",
];

/// Notifications the wallet's event system emits.
pub const DEFAULT_NOTIFICATIONS: &[&str] = &["accountsChanged", "chainChanged"];

/// The subset of an [OpenRPC](https://spec.open-rpc.org) document needed to list method names.
#[derive(Debug, Deserialize)]
struct OpenRpcDocument {
    methods: Vec<OpenRpcMethod>,
}

#[derive(Debug, Deserialize)]
struct OpenRpcMethod {
    name: String,
}

/// Returns the method names declared by the OpenRPC document at `path`, in document order.
pub fn read_openrpc_methods(path: &Path) -> Result<Vec<String>, RegistryError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| RegistryError::ReadDocument { path: path.to_path_buf(), source })?;
    parse_openrpc_methods(&content)
        .map_err(|source| RegistryError::ParseDocument { path: path.to_path_buf(), source })
}

fn parse_openrpc_methods(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let document: OpenRpcDocument = serde_json::from_str(content)?;
    Ok(document.methods.into_iter().map(|method| method.name).collect())
}
