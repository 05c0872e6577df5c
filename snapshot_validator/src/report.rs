use alloy_primitives::U256;
use snapshot_core::ValidationReport;

const RULE: &str = "-------------------------------------";

fn amount(value: &Option<U256>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

/// Render the itemized, human-readable report.
pub fn render_report(report: &ValidationReport) -> String {
    let block = report.target_block;
    let mut lines = vec![RULE.to_string()];

    lines.push(format!(
        "- Validating total supply: {}",
        report.supply_check_passed
    ));
    lines.push(format!(
        "    - Snapshot total: {} (expected {})",
        amount(&report.supply.total),
        report.supply.expected
    ));
    if report.supply.malformed_rows > 0 {
        lines.push(format!(
            "    - Malformed balances: {}",
            report.supply.malformed_rows
        ));
    }

    lines.push(format!(
        "- Validating token: {}",
        report.identity_check_passed
    ));
    lines.push(format!(
        "    - Name:   {} ({})",
        report.identity.observed_name.as_deref().unwrap_or("n/a"),
        report.identity.name_passed
    ));
    lines.push(format!(
        "    - Symbol: {} ({})",
        report.identity.observed_symbol.as_deref().unwrap_or("n/a"),
        report.identity.symbol_passed
    ));

    lines.push(format!(
        "- Validating token holder balances at Block #{}",
        block
    ));
    for result in &report.holder_results {
        lines.push("  ------".to_string());
        lines.push(format!("  - Address: {}", result.address));
        lines.push(format!("  - Balance at Block #{}:", block));
        lines.push(format!("    - Snapshot:   {}", amount(&result.claimed_balance)));
        lines.push(format!("    - Blockchain: {}", amount(&result.on_chain_balance)));
        if let Some(error) = &result.error {
            lines.push(format!("    - Error: {}", error));
        }
        lines.push(format!("  - Valid: {}", result.is_match));
    }
    lines.push("  ------".to_string());
    lines.push(format!(
        "- Validating token holder balances at Block #{}: {}",
        block,
        report.holders_passed()
    ));
    lines.push(format!(
        "    - Totals (snapshot / blockchain): {} / {}",
        amount(&report.claimed_total),
        amount(&report.on_chain_total)
    ));
    if !report.totals_consistent {
        lines.push("    - Warning: blockchain total differs from expected supply".to_string());
    }

    lines.push(RULE.to_string());
    lines.push(format!(
        "Snapshot Validation: {}",
        if report.overall_passed {
            "SUCCESS"
        } else {
            "FAILED"
        }
    ));

    lines.join("\n")
}
