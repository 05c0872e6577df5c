use log::info;

use super::holders::reconcile;
use super::identity::check_identity;
use super::supply::check_supply;
use super::verdict::combine;
use crate::error::ValidationError;
use crate::helpers::dto::{Expectations, Snapshot, ValidationReport};
use crate::ledger::LedgerAccessor;

pub const DEFAULT_MAX_CONCURRENT_QUERIES: usize = 8;

#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Upper bound on in-flight balance queries.
    pub max_concurrent_queries: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_concurrent_queries: DEFAULT_MAX_CONCURRENT_QUERIES,
        }
    }
}

/// Run the supply, identity and holder checks against `ledger` and combine them.
///
/// The identity check and the holder reconciliation run concurrently. If the ledger
/// becomes unavailable the whole run fails and no report is produced.
pub async fn validate_snapshot<L>(
    ledger: &L,
    snapshot: &Snapshot,
    expectations: &Expectations,
    options: &ValidationOptions,
) -> Result<ValidationReport, ValidationError>
where
    L: LedgerAccessor + ?Sized,
{
    if snapshot.rows.is_empty() {
        return Err(ValidationError::NoHolderRows);
    }
    if !ledger.is_reachable().await {
        return Err(ValidationError::LedgerUnavailable(
            "ledger is not reachable".to_string(),
        ));
    }

    info!("{} holders...", snapshot.rows.len());
    info!("Starting snapshot validation...");

    let supply = check_supply(&snapshot.rows, expectations.total_supply);

    let (identity, reconciliation) = tokio::try_join!(
        check_identity(ledger, &expectations.identity),
        reconcile(
            &snapshot.rows,
            snapshot.target_block,
            ledger,
            options.max_concurrent_queries,
        ),
    )?;

    Ok(combine(
        snapshot.target_block,
        supply,
        identity,
        reconciliation,
    ))
}
