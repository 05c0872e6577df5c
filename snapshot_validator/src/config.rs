use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::{Context, Result, anyhow};
use snapshot_core::helpers::amount::parse_amount;
use snapshot_core::sheets::handler::{
    DEFAULT_BLOCK_RANGE, DEFAULT_HOLDERS_RANGE, DEFAULT_SHEETS_API_URL, DEFAULT_SPREADSHEET_ID,
};
use snapshot_core::validation::handler::DEFAULT_MAX_CONCURRENT_QUERIES;
use snapshot_core::{Expectations, TokenIdentity, ValidationOptions};

const DEFAULT_LOCAL_NODE_URL: &str = "http://localhost:8545";
const DEFAULT_TOKEN_ARTIFACT: &str = "build/contracts/TrueDeckToken.json";
const DEFAULT_TOKEN_NAME: &str = "TrueDeck";
const DEFAULT_TOKEN_SYMBOL: &str = "TDP";
const DEFAULT_TOTAL_SUPPLY: &str = "2e+26";
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub spreadsheet_id: String,
    pub local_node_url: String,
    pub remote_node_url: Option<String>,
    pub token_address: Option<Address>,
    pub token_artifact: PathBuf,
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub sheets_api_url: String,
    pub block_range: String,
    pub holders_range: String,
    pub expectations: Expectations,
    pub validation: ValidationOptions,
    pub rpc_timeout: Duration,
}

impl Config {
    pub fn from_env(spreadsheet_id: Option<String>) -> Result<Self> {
        Self::from_lookup(spreadsheet_id, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(spreadsheet_id: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token_address = optional("TOKEN_ADDRESS")
            .map(|address| {
                Address::from_str(address.trim())
                    .map_err(|e| anyhow!("TOKEN_ADDRESS is not a valid address: {}", e))
            })
            .transpose()?;

        let total_supply_text = var("EXPECTED_TOTAL_SUPPLY", DEFAULT_TOTAL_SUPPLY);
        let total_supply = parse_amount(&total_supply_text)
            .with_context(|| format!("EXPECTED_TOTAL_SUPPLY {:?}", total_supply_text))?;

        let max_concurrent_queries = var(
            "MAX_CONCURRENT_QUERIES",
            &DEFAULT_MAX_CONCURRENT_QUERIES.to_string(),
        )
        .trim()
        .parse::<usize>()
        .context("MAX_CONCURRENT_QUERIES must be a positive integer")?
        .max(1);

        let rpc_timeout_secs = var("RPC_TIMEOUT_SECS", &DEFAULT_RPC_TIMEOUT_SECS.to_string())
            .trim()
            .parse::<u64>()
            .context("RPC_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Self {
            spreadsheet_id: spreadsheet_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SPREADSHEET_ID.to_string()),
            local_node_url: var("LOCAL_NODE_URL", DEFAULT_LOCAL_NODE_URL),
            remote_node_url: optional("REMOTE_NODE_URL"),
            token_address,
            token_artifact: PathBuf::from(var("TOKEN_ARTIFACT", DEFAULT_TOKEN_ARTIFACT)),
            credentials_path: PathBuf::from(var("GOOGLE_CREDENTIALS_PATH", "credentials.json")),
            token_path: PathBuf::from(var("GOOGLE_TOKEN_PATH", "token.json")),
            sheets_api_url: var("SHEETS_API_URL", DEFAULT_SHEETS_API_URL),
            block_range: var("BLOCK_RANGE", DEFAULT_BLOCK_RANGE),
            holders_range: var("HOLDERS_RANGE", DEFAULT_HOLDERS_RANGE),
            expectations: Expectations {
                identity: TokenIdentity {
                    name: var("EXPECTED_TOKEN_NAME", DEFAULT_TOKEN_NAME),
                    symbol: var("EXPECTED_TOKEN_SYMBOL", DEFAULT_TOKEN_SYMBOL),
                },
                total_supply,
            },
            validation: ValidationOptions {
                max_concurrent_queries,
            },
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
        })
    }
}
