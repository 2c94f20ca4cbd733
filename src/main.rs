//! Contract Inspector CLI.
//!
//! # Usage
//!
//! ```bash
//! # Full analysis, printed as JSON
//! contract-inspector analyze 0xdac17f958d2ee523a2206206994597c13d831ec7
//!
//! # Metadata only, no function calls
//! contract-inspector summary 0xdac17f958d2ee523a2206206994597c13d831ec7
//!
//! # HTTP API
//! contract-inspector serve --port 3000
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use contract_inspector::config::{Cli, Command};
use contract_inspector::{
    AnalyzerOptions, CachedResolver, ContractAnalyzer, EtherscanConfig, EtherscanResolver,
    RpcChainReader,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .init();

    let rpc_url = cli.validate()?;

    tracing::info!("RPC URL: {}", cli.rpc_url);
    tracing::info!("Etherscan API: {}", cli.etherscan_url);
    tracing::info!("Chain ID: {}", cli.chain_id);

    let resolver = EtherscanResolver::new(EtherscanConfig {
        base_url: cli.etherscan_url.clone(),
        api_key: cli.etherscan_api_key.clone(),
        chain_id: cli.chain_id,
        request_timeout_ms: Some(cli.resolver_timeout_ms),
        request_retry: Some(cli.request_retry),
        request_backoff_ms: Some(cli.request_backoff_ms),
    })?;
    let resolver = Arc::new(CachedResolver::new(
        resolver,
        cli.cache_ttl(),
        cli.cache_capacity,
    ));

    let chain = Arc::new(RpcChainReader::new(rpc_url));

    let analyzer = Arc::new(ContractAnalyzer::new(
        resolver,
        chain,
        AnalyzerOptions {
            call_timeout: cli.call_timeout(),
            resolver_timeout: cli.resolver_timeout(),
            max_concurrent_calls: cli.max_concurrent_calls,
        },
    ));

    match cli.command {
        Command::Analyze { address } => {
            let report = analyzer.analyze(&address).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Summary { address } => {
            let summary = analyzer.summary(&address).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Serve { port } => {
            contract_inspector::server::serve(analyzer, port).await?;
        }
    }

    Ok(())
}
