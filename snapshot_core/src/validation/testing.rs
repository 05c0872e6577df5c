use alloy_primitives::U256;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::LedgerAccessor;

/// In-memory ledger for pipeline tests.
pub struct MockLedger {
    balances: HashMap<(String, u64), LedgerResult<U256>>,
    name: LedgerResult<String>,
    symbol: LedgerResult<String>,
    reachable: bool,
    // Balance reads allowed before the ledger "drops its connection".
    fail_after: Option<usize>,
    // Latency of every balance read.
    delay: Option<Duration>,
    balance_calls: AtomicUsize,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            name: Ok("TrueDeck".to_string()),
            symbol: Ok("TDP".to_string()),
            reachable: true,
            fail_after: None,
            delay: None,
            balance_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(mut self, address: &str, block: u64, balance: u64) -> Self {
        self.balances
            .insert((address.to_string(), block), Ok(U256::from(balance)));
        self
    }

    pub fn with_balance_error(mut self, address: &str, block: u64, error: LedgerError) -> Self {
        self.balances.insert((address.to_string(), block), Err(error));
        self
    }

    pub fn with_identity(
        mut self,
        name: LedgerResult<String>,
        symbol: LedgerResult<String>,
    ) -> Self {
        self.name = name;
        self.symbol = symbol;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn failing_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerAccessor for MockLedger {
    async fn balance_of(&self, address: &str, block: u64) -> LedgerResult<U256> {
        let call = self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_after.is_some_and(|limit| call >= limit) {
            return Err(LedgerError::Unavailable("connection reset".to_string()));
        }

        self.balances
            .get(&(address.to_string(), block))
            .cloned()
            .unwrap_or(Ok(U256::ZERO))
    }

    async fn token_name(&self) -> LedgerResult<String> {
        self.name.clone()
    }

    async fn token_symbol(&self) -> LedgerResult<String> {
        self.symbol.clone()
    }

    async fn is_reachable(&self) -> bool {
        self.reachable
    }
}
