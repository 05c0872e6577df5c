use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CallRequest {
    pub to: String,
    pub data: String,
}

/// The parts of a Truffle build artifact needed to locate a deployed contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruffleArtifact {
    pub contract_name: Option<String>,
    #[serde(default)]
    pub networks: HashMap<String, DeployedNetwork>,
}

#[derive(Debug, Deserialize)]
pub struct DeployedNetwork {
    pub address: String,
}
