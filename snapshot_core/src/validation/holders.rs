use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};

use crate::error::{LedgerError, ValidationError};
use crate::helpers::amount::checked_sum;
use crate::helpers::dto::{ClaimedBalance, HolderCheckResult, Reconciliation, SnapshotRow};
use crate::ledger::LedgerAccessor;

/// Compare every holder's claimed balance with the ledger as of `target_block`.
///
/// Up to `max_concurrent` queries run at once and results come back in row order. A
/// failed read marks only that holder as a mismatch. If the ledger becomes unavailable
/// the remaining queries are dropped and no results are returned.
pub async fn reconcile<L>(
    rows: &[SnapshotRow],
    target_block: u64,
    ledger: &L,
    max_concurrent: usize,
) -> Result<Reconciliation, ValidationError>
where
    L: LedgerAccessor + ?Sized,
{
    debug!(
        "- Validating token holder balances at Block #{}",
        target_block
    );

    let results: Vec<HolderCheckResult> = stream::iter(rows)
        .map(|row| check_holder(ledger, row, target_block))
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await?;

    let claimed_total = checked_sum(results.iter().filter_map(|result| result.claimed_balance));
    let on_chain_total = checked_sum(results.iter().filter_map(|result| result.on_chain_balance));

    let valid = results.iter().all(|result| result.is_match);
    debug!(
        "- Validating token holder balances at Block #{}: {}",
        target_block, valid
    );

    Ok(Reconciliation {
        results,
        claimed_total,
        on_chain_total,
    })
}

async fn check_holder<L>(
    ledger: &L,
    row: &SnapshotRow,
    target_block: u64,
) -> Result<HolderCheckResult, ValidationError>
where
    L: LedgerAccessor + ?Sized,
{
    let (on_chain_balance, query_error) = match ledger.balance_of(&row.address, target_block).await
    {
        Ok(balance) => (Some(balance), None),
        Err(LedgerError::Unavailable(msg)) => return Err(ValidationError::LedgerUnavailable(msg)),
        Err(LedgerError::Query(msg)) => {
            warn!("Balance query failed for {}: {}", row.address, msg);
            (None, Some(msg))
        }
    };

    let claimed_balance = row.claimed_balance.amount();
    let claim_error = match &row.claimed_balance {
        ClaimedBalance::Malformed { raw, reason } => {
            warn!("Malformed claimed balance for {}: {:?}", row.address, raw);
            Some(format!("claimed balance {:?}: {}", raw, reason))
        }
        ClaimedBalance::Exact(_) => None,
    };
    let error = match (claim_error, query_error) {
        (Some(claim), Some(query)) => Some(format!("{}; {}", claim, query)),
        (claim, query) => claim.or(query),
    };

    let is_match = error.is_none() && claimed_balance == on_chain_balance;
    debug!(
        "{} snapshot={:?} blockchain={:?} valid={}",
        row.address, claimed_balance, on_chain_balance, is_match
    );

    Ok(HolderCheckResult {
        address: row.address.clone(),
        claimed_balance,
        on_chain_balance,
        is_match,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::testing::MockLedger;
    use alloy_primitives::U256;
    use std::time::Duration;

    const BLOCK: u64 = 6543210;

    fn row(address: &str, balance: u64) -> SnapshotRow {
        SnapshotRow::new(address, U256::from(balance))
    }

    #[tokio::test]
    async fn test_all_holders_match() {
        let ledger = MockLedger::new()
            .with_balance("0xa", BLOCK, 100)
            .with_balance("0xb", BLOCK, 200);
        let rows = vec![row("0xa", 100), row("0xb", 200)];

        let reconciliation = reconcile(&rows, BLOCK, &ledger, 4).await.unwrap();

        assert!(reconciliation.results.iter().all(|r| r.is_match));
        assert_eq!(reconciliation.claimed_total, Some(U256::from(300u64)));
        assert_eq!(reconciliation.on_chain_total, Some(U256::from(300u64)));
    }

    #[tokio::test]
    async fn test_queries_use_target_block() {
        // Current balance differs from the historical one.
        let ledger = MockLedger::new()
            .with_balance("0xa", BLOCK, 100)
            .with_balance("0xa", BLOCK + 1, 999);

        let reconciliation = reconcile(&[row("0xa", 100)], BLOCK, &ledger, 1)
            .await
            .unwrap();
        assert!(reconciliation.results[0].is_match);
    }

    #[tokio::test]
    async fn test_mismatch_does_not_stop_reconciliation() {
        let ledger = MockLedger::new()
            .with_balance("0xa", BLOCK, 99)
            .with_balance("0xb", BLOCK, 200)
            .with_balance("0xc", BLOCK, 300);
        let rows = vec![row("0xa", 100), row("0xb", 200), row("0xc", 300)];

        let reconciliation = reconcile(&rows, BLOCK, &ledger, 2).await.unwrap();

        let flags: Vec<bool> = reconciliation.results.iter().map(|r| r.is_match).collect();
        assert_eq!(flags, vec![false, true, true]);
        assert_eq!(reconciliation.claimed_total, Some(U256::from(600u64)));
        assert_eq!(reconciliation.on_chain_total, Some(U256::from(599u64)));
        assert_eq!(ledger.balance_calls(), 3);
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let mut ledger = MockLedger::new();
        let mut rows = Vec::new();
        for i in 0..50u64 {
            let address = format!("0x{:02x}", i);
            ledger = ledger.with_balance(&address, BLOCK, i);
            rows.push(row(&address, i));
        }

        let reconciliation = reconcile(&rows, BLOCK, &ledger, 8).await.unwrap();

        assert_eq!(reconciliation.results.len(), rows.len());
        for (result, row) in reconciliation.results.iter().zip(&rows) {
            assert_eq!(result.address, row.address);
        }
    }

    #[tokio::test]
    async fn test_query_error_is_recorded_per_holder() {
        let ledger = MockLedger::new()
            .with_balance_error("0xa", BLOCK, LedgerError::Query("missing trie node".to_string()))
            .with_balance("0xb", BLOCK, 200);
        let rows = vec![row("0xa", 100), row("0xb", 200)];

        let reconciliation = reconcile(&rows, BLOCK, &ledger, 2).await.unwrap();

        let failed = &reconciliation.results[0];
        assert!(!failed.is_match);
        assert_eq!(failed.on_chain_balance, None);
        assert_eq!(failed.error.as_deref(), Some("missing trie node"));
        assert!(reconciliation.results[1].is_match);
        assert_eq!(reconciliation.on_chain_total, Some(U256::from(200u64)));
    }

    #[tokio::test]
    async fn test_malformed_claim_is_still_queried() {
        let ledger = MockLedger::new().with_balance("0xa", BLOCK, 100);
        let rows = vec![SnapshotRow::from_cells("0xa", Some("1.5"))];

        let reconciliation = reconcile(&rows, BLOCK, &ledger, 1).await.unwrap();

        let result = &reconciliation.results[0];
        assert!(!result.is_match);
        assert_eq!(result.claimed_balance, None);
        assert_eq!(result.on_chain_balance, Some(U256::from(100u64)));
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_malformed_claim_keeps_query_error() {
        let ledger = MockLedger::new().with_balance_error(
            "0xa",
            BLOCK,
            LedgerError::Query("missing trie node".to_string()),
        );
        let rows = vec![SnapshotRow::from_cells("0xa", Some("abc"))];

        let reconciliation = reconcile(&rows, BLOCK, &ledger, 1).await.unwrap();

        let error = reconciliation.results[0].error.as_deref().unwrap();
        assert!(error.starts_with("claimed balance \"abc\""));
        assert!(error.ends_with("; missing trie node"));
    }

    #[tokio::test]
    async fn test_unavailable_ledger_aborts() {
        let mut ledger = MockLedger::new();
        let mut rows = Vec::new();
        for i in 0..20u64 {
            let address = format!("0x{:02x}", i);
            ledger = ledger.with_balance(&address, BLOCK, i);
            rows.push(row(&address, i));
        }
        let ledger = ledger.failing_after(5);

        let err = reconcile(&rows, BLOCK, &ledger, 1).await.unwrap_err();

        assert!(matches!(err, ValidationError::LedgerUnavailable(_)));
        // Sequential run: the sixth call fails and nothing after it is issued.
        assert_eq!(ledger.balance_calls(), 6);
    }

    #[tokio::test]
    async fn test_unavailable_ledger_cancels_concurrent_queries() {
        const MAX_CONCURRENT: usize = 4;

        let mut ledger = MockLedger::new();
        let mut rows = Vec::new();
        for i in 0..40u64 {
            let address = format!("0x{:02x}", i);
            ledger = ledger.with_balance(&address, BLOCK, i);
            rows.push(row(&address, i));
        }
        let ledger = ledger
            .failing_after(5)
            .with_delay(Duration::from_millis(10));

        let err = reconcile(&rows, BLOCK, &ledger, MAX_CONCURRENT)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::LedgerUnavailable(_)));

        // Only the queries already in flight beside the failing one were started.
        let started = ledger.balance_calls();
        assert!(started >= 6);
        assert!(started <= 6 + MAX_CONCURRENT - 1, "started {} queries", started);

        // Pending queries were dropped, not left running.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ledger.balance_calls(), started);
    }
}
