use log::debug;

use crate::helpers::dto::{
    HolderCheckResult, IdentityCheck, Reconciliation, SupplyCheck, ValidationReport,
};

/// The overall verdict: every check must pass and every holder must match.
pub fn overall_verdict(
    supply_passed: bool,
    identity_passed: bool,
    holder_results: &[HolderCheckResult],
) -> bool {
    [
        supply_passed,
        identity_passed,
        holder_results.iter().all(|result| result.is_match),
    ]
    .into_iter()
    .all(|passed| passed)
}

/// Fold the three partial outcomes into the final report.
pub fn combine(
    target_block: u64,
    supply: SupplyCheck,
    identity: IdentityCheck,
    reconciliation: Reconciliation,
) -> ValidationReport {
    let Reconciliation {
        results,
        claimed_total,
        on_chain_total,
    } = reconciliation;

    let supply_check_passed = supply.passed;
    let identity_check_passed = identity.passed();
    let overall_passed = overall_verdict(supply_check_passed, identity_check_passed, &results);
    // Informational: the queried holders account for the whole expected supply.
    let totals_consistent = on_chain_total == Some(supply.expected);

    debug!(
        "Snapshot Validation: {}",
        if overall_passed { "SUCCESS" } else { "FAILED" }
    );

    ValidationReport {
        target_block,
        supply_check_passed,
        identity_check_passed,
        holder_results: results,
        overall_passed,
        supply,
        identity,
        claimed_total,
        on_chain_total,
        totals_consistent,
    }
}
