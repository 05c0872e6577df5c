use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;

use super::abi::{
    block_tag, decode_hex, decode_string, decode_uint256, encode_balance_of, encode_selector,
    NAME_SELECTOR, SYMBOL_SELECTOR,
};
use super::dto::CallRequest;
use super::rpc::RpcClient;
use super::LedgerAccessor;
use crate::error::{LedgerError, LedgerResult};

/// ERC-20 token ledger read through an Ethereum JSON-RPC node.
#[derive(Debug)]
pub struct JsonRpcLedger {
    rpc: RpcClient,
    token: Address,
}

impl JsonRpcLedger {
    pub fn new(rpc: RpcClient, token: Address) -> Self {
        Self { rpc, token }
    }

    pub fn token_address(&self) -> Address {
        self.token
    }

    async fn eth_call(&self, data: String, block: String) -> LedgerResult<Vec<u8>> {
        let call = CallRequest {
            to: format!("{:#x}", self.token),
            data,
        };

        let result = self.rpc.call("eth_call", json!([call, block])).await?;
        match result {
            Value::String(hex) => decode_hex(&hex),
            other => Err(LedgerError::Query(format!(
                "eth_call returned unexpected value: {}",
                other
            ))),
        }
    }

    async fn read_string(&self, selector: [u8; 4]) -> LedgerResult<String> {
        let data = self
            .eth_call(encode_selector(selector), "latest".to_string())
            .await?;
        decode_string(&data)
    }
}

#[async_trait]
impl LedgerAccessor for JsonRpcLedger {
    async fn balance_of(&self, address: &str, block: u64) -> LedgerResult<U256> {
        let holder = Address::from_str(address)
            .map_err(|e| LedgerError::Query(format!("Invalid address {}: {}", address, e)))?;

        let data = self
            .eth_call(encode_balance_of(&holder), block_tag(block))
            .await?;

        // An empty return means no contract code at that block.
        if data.is_empty() {
            return Err(LedgerError::Query(format!(
                "Token has no code at block #{}",
                block
            )));
        }
        decode_uint256(&data)
    }

    async fn token_name(&self) -> LedgerResult<String> {
        self.read_string(NAME_SELECTOR).await
    }

    async fn token_symbol(&self) -> LedgerResult<String> {
        self.read_string(SYMBOL_SELECTOR).await
    }

    async fn is_reachable(&self) -> bool {
        self.rpc.is_listening().await
    }
}
