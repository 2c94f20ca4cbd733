//! Top-level failure modes of a contract analysis.
//!
//! Only two things abort a whole analysis: a malformed address (rejected before
//! any I/O) and an unusable metadata service. Everything that goes wrong on the
//! chain-call path is scoped to the individual function and lands inside the
//! report as a [`crate::report::CallFailure`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input did not parse as an EVM address. No network calls were made.
    #[error("invalid contract address: {0}")]
    InvalidAddress(String),

    /// The metadata service could not produce an ABI for a reason other than
    /// "contract not verified" (unreachable, rate limited, timed out).
    #[error("metadata service unavailable: {0}")]
    MetadataUnavailable(String),
}

/// Failures reported by a [`crate::metadata::MetadataResolver`].
///
/// "Unverified" is deliberately not an error: the resolver reports it in-band
/// via [`crate::report::VerificationStatus`] and the engine turns it into a
/// report with an empty callable set.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("metadata service unreachable: {0}")]
    Unreachable(String),

    #[error("metadata service rate limited: {0}")]
    RateLimited(String),
}

/// Failures reported by a [`crate::chain::ChainReader`].
///
/// Timeouts are not produced here; the engine imposes its own deadline around
/// every call.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("rpc endpoint unreachable: {0}")]
    Unreachable(String),
}

impl From<ResolveError> for AnalysisError {
    fn from(err: ResolveError) -> Self {
        AnalysisError::MetadataUnavailable(err.to_string())
    }
}
