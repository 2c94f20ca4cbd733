//! Contract analysis engine.
//!
//! Orchestrates resolution, classification, concurrent invocation, and
//! aggregation: resolve the ABI, keep the zero-argument read-only functions,
//! fan out one bounded `eth_call` per function, and assemble a report in ABI
//! declaration order. Per-function failures never abort the analysis; only a
//! malformed address or an unusable metadata service do.

use std::sync::Arc;
use std::time::Duration;

use alloy_json_abi::Function;
use alloy_primitives::Bytes;
use futures::StreamExt;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::abi::{callable_functions, summarize_functions};
use crate::address::ContractAddress;
use crate::chain::ChainReader;
use crate::error::{AnalysisError, CallError};
use crate::metadata::MetadataResolver;
use crate::report::{CallResult, ContractReport, ContractSummary, FailureKind, VerificationStatus};
use crate::value::decode_output;

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Deadline for each individual function call.
    pub call_timeout: Duration,
    /// Deadline for the metadata resolution step, so an unresponsive
    /// metadata service cannot hang the whole operation.
    pub resolver_timeout: Duration,
    /// Cap on simultaneous in-flight RPC calls.
    pub max_concurrent_calls: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
            resolver_timeout: Duration::from_secs(30),
            max_concurrent_calls: 8,
        }
    }
}

/// The analysis engine. Both collaborators are injected so tests can
/// substitute mocks without process-wide state.
#[derive(Clone)]
pub struct ContractAnalyzer {
    resolver: Arc<dyn MetadataResolver>,
    chain: Arc<dyn ChainReader>,
    options: AnalyzerOptions,
}

impl ContractAnalyzer {
    pub fn new(
        resolver: Arc<dyn MetadataResolver>,
        chain: Arc<dyn ChainReader>,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            resolver,
            chain,
            options,
        }
    }

    /// Analyze a contract: resolve its ABI and read every zero-argument
    /// view/pure function.
    pub async fn analyze(&self, address: &str) -> Result<ContractReport, AnalysisError> {
        let address = ContractAddress::parse(address)?;
        let metadata = self.resolve_metadata(&address).await?;

        if metadata.verification == VerificationStatus::Unverified {
            info!(
                target: "contract_inspector::engine",
                address = %address,
                "contract is unverified, skipping function calls"
            );
            return Ok(ContractReport {
                address,
                contract_name: metadata.contract_name,
                verification_status: VerificationStatus::Unverified,
                abi_summary: Vec::new(),
                calls: Vec::new(),
            });
        }

        let callables = callable_functions(&metadata.functions);
        debug!(
            target: "contract_inspector::engine",
            address = %address,
            total = metadata.functions.len(),
            callable = callables.len(),
            "classified ABI functions"
        );

        let calls = self.invoke_all(&address, &callables).await;

        info!(
            target: "contract_inspector::engine",
            address = %address,
            succeeded = calls.iter().filter(|c| c.is_success()).count(),
            failed = calls.iter().filter(|c| !c.is_success()).count(),
            "analysis complete"
        );

        Ok(ContractReport {
            address,
            contract_name: metadata.contract_name,
            verification_status: VerificationStatus::Verified,
            abi_summary: summarize_functions(&metadata.functions),
            calls,
        })
    }

    /// Metadata-only view of a contract. Never issues chain calls.
    pub async fn summary(&self, address: &str) -> Result<ContractSummary, AnalysisError> {
        let address = ContractAddress::parse(address)?;
        let metadata = self.resolve_metadata(&address).await?;
        let callable = callable_functions(&metadata.functions).len();

        Ok(ContractSummary {
            address,
            contract_name: metadata.contract_name,
            verification_status: metadata.verification,
            total_functions: metadata.functions.len(),
            callable_functions: callable,
        })
    }

    async fn resolve_metadata(
        &self,
        address: &ContractAddress,
    ) -> Result<crate::metadata::ContractMetadata, AnalysisError> {
        match timeout(self.options.resolver_timeout, self.resolver.resolve(address)).await {
            Ok(result) => result.map_err(AnalysisError::from),
            Err(_) => Err(AnalysisError::MetadataUnavailable(format!(
                "metadata resolution did not complete within {:?}",
                self.options.resolver_timeout
            ))),
        }
    }

    /// Fan out one call per callable function, bounded by the concurrency
    /// cap, and reassemble outcomes in declaration order.
    ///
    /// Each task writes exactly one slot, indexed by the function's position;
    /// completion order is irrelevant to the result.
    async fn invoke_all(
        &self,
        address: &ContractAddress,
        callables: &[Function],
    ) -> Vec<CallResult> {
        let mut slots: Vec<Option<CallResult>> = callables.iter().map(|_| None).collect();

        let futures: Vec<_> = callables
            .iter()
            .enumerate()
            .map(|(index, func)| {
                let chain = Arc::clone(&self.chain);
                let address = address.address();
                let call_timeout = self.options.call_timeout;
                async move {
                    (
                        index,
                        invoke_one(chain.as_ref(), address, func, call_timeout).await,
                    )
                }
            })
            .collect();

        let mut outcomes = futures::stream::iter(futures)
            .buffer_unordered(self.options.max_concurrent_calls.max(1));

        while let Some((index, result)) = outcomes.next().await {
            slots[index] = Some(result);
        }

        // Every slot was written exactly once by its task.
        slots.into_iter().flatten().collect()
    }
}

async fn invoke_one(
    chain: &dyn ChainReader,
    address: alloy_primitives::Address,
    func: &Function,
    call_timeout: Duration,
) -> CallResult {
    let calldata = Bytes::copy_from_slice(func.selector().as_slice());

    match timeout(call_timeout, chain.call(address, calldata)).await {
        Err(_) => CallResult::failure(
            func,
            FailureKind::Timeout,
            format!("call did not complete within {call_timeout:?}"),
        ),
        Ok(Err(CallError::Reverted(message))) => {
            CallResult::failure(func, FailureKind::ExecutionReverted, message)
        }
        Ok(Err(CallError::Unreachable(message))) => {
            CallResult::failure(func, FailureKind::RpcUnavailable, message)
        }
        Ok(Ok(raw)) => match decode_output(func, &raw) {
            Ok(values) => CallResult::success(func, values),
            Err(message) => CallResult::failure(func, FailureKind::DecodeError, message),
        },
    }
}
