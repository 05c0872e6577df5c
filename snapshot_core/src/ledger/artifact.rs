use alloy_primitives::Address;
use log::info;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::dto::TruffleArtifact;
use super::rpc::RpcClient;
use crate::error::{LedgerError, LedgerResult};

/// Read a Truffle build artifact from disk.
pub fn load_artifact(path: &Path) -> LedgerResult<TruffleArtifact> {
    let content = fs::read_to_string(path).map_err(|e| {
        LedgerError::Unavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        LedgerError::Unavailable(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Address the artifact records for the given network id.
pub fn deployed_address(artifact: &TruffleArtifact, network_id: &str) -> LedgerResult<Address> {
    let contract = artifact.contract_name.as_deref().unwrap_or("contract");
    let network = artifact.networks.get(network_id).ok_or_else(|| {
        LedgerError::Unavailable(format!(
            "{} is not deployed on network {}",
            contract, network_id
        ))
    })?;

    Address::from_str(&network.address).map_err(|e| {
        LedgerError::Unavailable(format!(
            "Invalid {} address {}: {}",
            contract, network.address, e
        ))
    })
}

/// Locate the token the same way `truffle-contract`'s `deployed()` does: by the node's network id.
pub async fn resolve_token_address(rpc: &RpcClient, artifact_path: &Path) -> LedgerResult<Address> {
    let artifact = load_artifact(artifact_path)?;
    let network_id = rpc.net_version().await.map_err(|e| {
        LedgerError::Unavailable(format!("Failed to read network id: {}", e))
    })?;

    let address = deployed_address(&artifact, &network_id)?;
    info!("Token contract on network {}: {}", network_id, address);
    Ok(address)
}
