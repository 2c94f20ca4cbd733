//! Read-only chain access.
//!
//! [`ChainReader`] is the seam between the engine and the RPC endpoint: it
//! takes prepared calldata (a bare selector for zero-argument functions) and
//! returns the raw return bytes. Decoding happens upstream against the ABI's
//! declared output types.

use alloy_primitives::{Address, Bytes, TxKind};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_transport::TransportError;
use async_trait::async_trait;
use tracing::trace;
use url::Url;

use crate::error::CallError;

/// Component executing `eth_call` against an RPC endpoint.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute a read-only call and return the raw return bytes.
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallError>;
}

/// Production reader backed by an HTTP JSON-RPC provider.
pub struct RpcChainReader {
    provider: RootProvider,
}

impl RpcChainReader {
    pub fn new(rpc_url: Url) -> Self {
        Self {
            provider: RootProvider::new_http(rpc_url),
        }
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallError> {
        let tx = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(calldata.clone()),
            ..Default::default()
        };

        trace!(
            target: "contract_inspector::chain",
            to = %to,
            calldata = %calldata,
            "issuing eth_call"
        );

        self.provider.call(tx).await.map_err(classify_rpc_error)
    }
}

/// Split transport errors from in-EVM reverts.
///
/// Reverts come back as a JSON-RPC error response (code 3 per the execution
/// API spec, message "execution reverted"); anything without an error payload
/// is a transport-level failure.
fn classify_rpc_error(err: TransportError) -> CallError {
    if let Some(payload) = err.as_error_resp() {
        let message = payload.message.to_string();
        if payload.code == 3 || message.to_lowercase().contains("revert") {
            return CallError::Reverted(message);
        }
        return CallError::Unreachable(message);
    }
    CallError::Unreachable(err.to_string())
}
