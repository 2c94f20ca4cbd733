//! Contract Inspector - on-chain state reader for EVM contracts.
//!
//! Resolves a contract's ABI from an Etherscan-compatible metadata service,
//! filters it down to the zero-argument `view`/`pure` functions, calls them
//! all concurrently over JSON-RPC, and assembles a single report in ABI
//! declaration order. Individual call failures stay inside the report; only
//! a malformed address or an unusable metadata service fail the operation.

pub mod abi;
pub mod address;
pub mod cache;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod etherscan;
pub mod metadata;
pub mod report;
pub mod server;
pub mod value;

pub use address::ContractAddress;
pub use cache::CachedResolver;
pub use chain::{ChainReader, RpcChainReader};
pub use engine::{AnalyzerOptions, ContractAnalyzer};
pub use error::{AnalysisError, CallError, ResolveError};
pub use etherscan::{EtherscanConfig, EtherscanResolver};
pub use metadata::{ContractMetadata, MetadataResolver};
pub use report::{
    CallFailure, CallOutcome, CallResult, ContractReport, ContractSummary, FailureKind,
    VerificationStatus,
};
pub use value::DecodedValue;
