//! Etherscan-backed metadata resolver.
//!
//! Uses the v2 `getsourcecode` endpoint, which carries the ABI, the contract
//! name, and (implicitly) the verification status in a single response.
//! Transient failures are retried with a fixed backoff before being surfaced.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::abi::parse_abi_functions;
use crate::address::ContractAddress;
use crate::error::ResolveError;
use crate::metadata::{ContractMetadata, MetadataResolver};
use crate::report::VerificationStatus;

/// Sentinel the Etherscan API returns in the ABI field of unverified
/// contracts.
const UNVERIFIED_ABI: &str = "Contract source code not verified";

#[derive(Debug, Clone, Deserialize)]
pub struct EtherscanConfig {
    pub base_url: String,
    pub api_key: String,
    pub chain_id: u64,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub request_retry: Option<usize>,
    #[serde(default)]
    pub request_backoff_ms: Option<u64>,
}

pub struct EtherscanResolver {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    chain_id: u64,
    request_retry: usize,
    request_backoff: Duration,
}

impl EtherscanResolver {
    pub fn new(config: EtherscanConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).context("invalid Etherscan base URL")?;
        let timeout = Duration::from_millis(config.request_timeout_ms.unwrap_or(10_000));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
            chain_id: config.chain_id,
            request_retry: config.request_retry.unwrap_or(2),
            request_backoff: Duration::from_millis(config.request_backoff_ms.unwrap_or(250)),
        })
    }

    async fn get_source_code(&self, address: &ContractAddress) -> Result<String, ResolveError> {
        let address = address.to_string();
        let mut attempts = 0;
        loop {
            match self.request_once(&address).await {
                Ok(body) => return Ok(body),
                Err(err) if attempts < self.request_retry => {
                    attempts += 1;
                    warn!(
                        target: "contract_inspector::etherscan",
                        attempt = attempts,
                        error = %err,
                        "getsourcecode failed, backing off"
                    );
                    sleep(self.request_backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn request_once(&self, address: &str) -> Result<String, ResolveError> {
        let chain_id = self.chain_id.to_string();
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address),
                ("apikey", self.api_key.as_str()),
                ("chainid", chain_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ResolveError::Unreachable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ResolveError::RateLimited("HTTP 429".to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ResolveError::Unreachable(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ResolveError::Unreachable(e.to_string()))
    }
}

#[async_trait]
impl MetadataResolver for EtherscanResolver {
    async fn resolve(&self, address: &ContractAddress) -> Result<ContractMetadata, ResolveError> {
        let body = self.get_source_code(address).await?;
        let metadata = parse_source_code_response(&body)?;
        debug!(
            target: "contract_inspector::etherscan",
            address = %address,
            verified = metadata.verification == VerificationStatus::Verified,
            functions = metadata.functions.len(),
            "resolved contract metadata"
        );
        Ok(metadata)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SourceCodeEntry {
    #[serde(rename = "ABI", default)]
    abi: String,
    #[serde(rename = "ContractName", default)]
    contract_name: String,
}

/// Parse a `getsourcecode` response body into contract metadata.
///
/// Kept free of I/O so fixture payloads can exercise it directly.
pub fn parse_source_code_response(body: &str) -> Result<ContractMetadata, ResolveError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ResolveError::Unreachable(format!("unexpected payload: {e}")))?;

    if response.status != "1" {
        let detail = response
            .result
            .as_str()
            .unwrap_or_default()
            .to_string();
        if detail.to_lowercase().contains("rate limit") {
            return Err(ResolveError::RateLimited(detail));
        }
        return Err(ResolveError::Unreachable(format!(
            "{}: {detail}",
            response.message
        )));
    }

    let entries: Vec<SourceCodeEntry> = serde_json::from_value(response.result)
        .map_err(|e| ResolveError::Unreachable(format!("unexpected result shape: {e}")))?;
    let Some(entry) = entries.into_iter().next() else {
        return Ok(ContractMetadata::unverified());
    };

    if entry.abi.is_empty() || entry.abi == UNVERIFIED_ABI {
        return Ok(ContractMetadata::unverified());
    }

    let functions = parse_abi_functions(&entry.abi)
        .map_err(|e| ResolveError::Unreachable(format!("unparsable ABI in response: {e}")))?;

    let contract_name = if entry.contract_name.trim().is_empty() {
        None
    } else {
        Some(entry.contract_name.trim().to_string())
    };

    Ok(ContractMetadata {
        contract_name,
        verification: VerificationStatus::Verified,
        functions,
    })
}
