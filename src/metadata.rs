//! Abstraction over the contract-metadata service.

use alloy_json_abi::Function;
use async_trait::async_trait;

use crate::address::ContractAddress;
use crate::error::ResolveError;
use crate::report::VerificationStatus;

/// What the metadata service knows about a contract.
#[derive(Debug, Clone)]
pub struct ContractMetadata {
    pub contract_name: Option<String>,
    pub verification: VerificationStatus,
    /// Function entries of the ABI, in declaration order. Empty when the
    /// contract is unverified.
    pub functions: Vec<Function>,
}

impl ContractMetadata {
    /// Metadata for a contract the service has no ABI for.
    pub fn unverified() -> Self {
        Self {
            contract_name: None,
            verification: VerificationStatus::Unverified,
            functions: Vec::new(),
        }
    }
}

/// Component responsible for resolving a contract's ABI and basic metadata.
///
/// Implementations are injected into the engine at construction time so tests
/// can substitute mocks without process-wide state.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, address: &ContractAddress) -> Result<ContractMetadata, ResolveError>;
}
