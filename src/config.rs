//! CLI and runtime configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use url::Url;

/// EVM contract inspector
///
/// Resolves a contract's ABI from an Etherscan-compatible API and reads its
/// current on-chain state by calling every zero-argument view function.
#[derive(Parser, Debug)]
#[command(name = "contract-inspector")]
#[command(about = "Inspect the readable on-chain state of an EVM contract", long_about = None)]
pub struct Cli {
    /// Ethereum JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = "https://eth.llamarpc.com")]
    pub rpc_url: String,

    /// Etherscan-compatible API base URL
    #[arg(
        long,
        env = "ETHERSCAN_BASE_URL",
        default_value = "https://api.etherscan.io/v2/api"
    )]
    pub etherscan_url: String,

    /// Etherscan API key
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: String,

    /// Chain id passed to the metadata service
    #[arg(long, env = "CHAIN_ID", default_value = "1")]
    pub chain_id: u64,

    /// Per-function call deadline, in milliseconds
    #[arg(long, default_value = "5000")]
    pub call_timeout_ms: u64,

    /// Metadata resolution deadline, in milliseconds
    #[arg(long, default_value = "30000")]
    pub resolver_timeout_ms: u64,

    /// Cap on simultaneous in-flight RPC calls
    #[arg(long, default_value = "8")]
    pub max_concurrent_calls: usize,

    /// Retries for metadata service requests
    #[arg(long, default_value = "2")]
    pub request_retry: usize,

    /// Backoff between metadata retries, in milliseconds
    #[arg(long, default_value = "250")]
    pub request_backoff_ms: u64,

    /// ABI cache time-to-live, in seconds
    #[arg(long, default_value = "300")]
    pub cache_ttl_secs: u64,

    /// ABI cache capacity (entries)
    #[arg(long, default_value = "256")]
    pub cache_capacity: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a contract and print the full report as JSON
    Analyze {
        /// Contract address (0x-prefixed hex)
        address: String,
    },
    /// Print contract metadata as JSON without calling any functions
    Summary {
        /// Contract address (0x-prefixed hex)
        address: String,
    },
    /// Serve the analysis API over HTTP
    Serve {
        /// Listen port
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}

impl Cli {
    /// Validate the configuration before anything touches the network.
    pub fn validate(&self) -> Result<Url> {
        let rpc_url = Url::parse(&self.rpc_url).context("invalid RPC URL")?;
        Url::parse(&self.etherscan_url).context("invalid Etherscan base URL")?;
        if self.etherscan_api_key.trim().is_empty() {
            bail!("Etherscan API key must not be empty");
        }
        if self.call_timeout_ms == 0 || self.resolver_timeout_ms == 0 {
            bail!("timeouts must be greater than zero");
        }
        if self.max_concurrent_calls == 0 {
            bail!("max-concurrent-calls must be at least 1");
        }
        Ok(rpc_url)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_millis(self.resolver_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "contract-inspector",
            "--etherscan-api-key",
            "TESTKEY",
            "analyze",
            "0xdac17f958d2ee523a2206206994597c13d831ec7",
        ]
    }

    #[test]
    fn test_defaults_validate() {
        let cli = Cli::parse_from(base_args());
        assert!(cli.validate().is_ok());
        assert_eq!(cli.chain_id, 1);
        assert_eq!(cli.max_concurrent_calls, 8);
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let mut args = base_args();
        args[2] = " ";
        let cli = Cli::parse_from(args);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_rpc_url() {
        let mut args = base_args();
        args.splice(1..1, ["--rpc-url", "not a url"]);
        let cli = Cli::parse_from(args);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut args = base_args();
        args.splice(1..1, ["--max-concurrent-calls", "0"]);
        let cli = Cli::parse_from(args);
        assert!(cli.validate().is_err());
    }
}
