pub mod abi;
pub mod artifact;
pub mod dto;
pub mod handler;
pub mod rpc;

use alloy_primitives::U256;
use async_trait::async_trait;

use crate::error::LedgerResult;

/// Read-only view of the token ledger.
///
/// Implementations must allow concurrent reads; the reconciler issues many
/// `balance_of` calls at once.
#[async_trait]
pub trait LedgerAccessor: Send + Sync {
    /// Balance of `address` as of `block`, in base units.
    async fn balance_of(&self, address: &str, block: u64) -> LedgerResult<U256>;

    /// Token name at the chain head.
    async fn token_name(&self) -> LedgerResult<String>;

    /// Token symbol at the chain head.
    async fn token_symbol(&self) -> LedgerResult<String>;

    async fn is_reachable(&self) -> bool;
}

pub use handler::JsonRpcLedger;
pub use rpc::RpcClient;
