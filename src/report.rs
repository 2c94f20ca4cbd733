//! Report types returned to callers.
//!
//! A report is complete even when every call failed: the engine never drops a
//! function from the report because its own invocation failed. Success and
//! failure of each call serialize to distinguishable shapes (`value` vs
//! `error`), so callers never have to guess.

use alloy_json_abi::Function;
use serde::Serialize;

use crate::abi::FunctionSummary;
use crate::address::ContractAddress;
use crate::value::DecodedValue;

/// Whether the metadata service has a published, confirmed ABI for the
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Unverified,
}

/// Machine-readable classification of a per-function failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DecodeError,
    ExecutionReverted,
    Timeout,
    RpcUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one function invocation. Exactly one of the variants'
/// distinguishing fields (`value` / `error`) appears in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CallOutcome {
    Success { value: Vec<DecodedValue> },
    Failure { error: CallFailure },
}

/// Result of invoking one callable function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult {
    pub function: String,
    pub selector: String,
    #[serde(flatten)]
    pub outcome: CallOutcome,
}

impl CallResult {
    pub fn success(func: &Function, value: Vec<DecodedValue>) -> Self {
        Self {
            function: func.name.clone(),
            selector: format!("0x{}", hex::encode(func.selector().as_slice())),
            outcome: CallOutcome::Success { value },
        }
    }

    pub fn failure(func: &Function, kind: FailureKind, message: String) -> Self {
        Self {
            function: func.name.clone(),
            selector: format!("0x{}", hex::encode(func.selector().as_slice())),
            outcome: CallOutcome::Failure {
                error: CallFailure { kind, message },
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CallOutcome::Success { .. })
    }

    /// The failure kind, if this result is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            CallOutcome::Failure { error } => Some(error.kind),
            CallOutcome::Success { .. } => None,
        }
    }
}

/// Full analysis report for one contract.
#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub address: ContractAddress,
    pub contract_name: Option<String>,
    pub verification_status: VerificationStatus,
    /// Every function of the ABI, in declaration order.
    pub abi_summary: Vec<FunctionSummary>,
    /// One entry per callable function, in ABI declaration order regardless
    /// of call completion order.
    pub calls: Vec<CallResult>,
}

/// Metadata-only view of a contract; produced without any chain calls.
#[derive(Debug, Clone, Serialize)]
pub struct ContractSummary {
    pub address: ContractAddress,
    pub contract_name: Option<String>,
    pub verification_status: VerificationStatus,
    pub total_functions: usize,
    pub callable_functions: usize,
}
