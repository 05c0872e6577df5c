use alloy_primitives::U256;
use log::{debug, warn};

use crate::helpers::amount::checked_sum;
use crate::helpers::dto::{SnapshotRow, SupplyCheck};

/// Exact total of the claimed balances.
///
/// `total` is `None` only if the sum does not fit in 256 bits. Malformed balances are
/// counted, not summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyTotal {
    pub total: Option<U256>,
    pub malformed_rows: usize,
}

pub fn sum_claimed(rows: &[SnapshotRow]) -> SupplyTotal {
    let malformed_rows = rows
        .iter()
        .filter(|row| row.claimed_balance.amount().is_none())
        .count();
    let total = checked_sum(rows.iter().filter_map(|row| row.claimed_balance.amount()));

    SupplyTotal {
        total,
        malformed_rows,
    }
}

/// Compare the claimed total against the expected supply; off by one base unit fails.
pub fn check_supply(rows: &[SnapshotRow], expected: U256) -> SupplyCheck {
    let SupplyTotal {
        total,
        malformed_rows,
    } = sum_claimed(rows);

    if malformed_rows > 0 {
        warn!("{} rows have a malformed claimed balance", malformed_rows);
    }

    let passed = malformed_rows == 0 && total == Some(expected);
    debug!("- Validating total supply: {}", passed);

    SupplyCheck {
        total,
        expected,
        malformed_rows,
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(address: &str, balance: u64) -> SnapshotRow {
        SnapshotRow::new(address, U256::from(balance))
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total = sum_claimed(&[]);
        assert_eq!(total.total, Some(U256::ZERO));
        assert_eq!(total.malformed_rows, 0);
    }

    #[test]
    fn test_sum_is_order_independent() {
        let rows = vec![row("0xa", 100), row("0xb", 200), row("0xc", 7)];
        let mut reversed = rows.clone();
        reversed.reverse();
        let mut rotated = rows.clone();
        rotated.rotate_left(1);

        let expected = sum_claimed(&rows);
        assert_eq!(expected.total, Some(U256::from(307u64)));
        assert_eq!(sum_claimed(&reversed), expected);
        assert_eq!(sum_claimed(&rotated), expected);
    }

    #[test]
    fn test_duplicate_addresses_both_count() {
        let rows = vec![row("0xa", 100), row("0xa", 100)];
        assert_eq!(sum_claimed(&rows).total, Some(U256::from(200u64)));
    }

    #[test]
    fn test_supply_matches_exactly() {
        let rows = vec![row("0xa", 100), row("0xb", 200)];
        assert!(check_supply(&rows, U256::from(300u64)).passed);
    }

    #[test]
    fn test_supply_off_by_one_fails() {
        let rows = vec![row("0xa", 100), row("0xb", 201)];
        let check = check_supply(&rows, U256::from(300u64));
        assert!(!check.passed);
        assert_eq!(check.total, Some(U256::from(301u64)));
    }

    #[test]
    fn test_large_balances_stay_exact() {
        let supply = U256::from(2u64) * U256::from(10u64).pow(U256::from(26u64));
        let rows = vec![
            SnapshotRow::new("0xa", supply - U256::from(1u64)),
            SnapshotRow::new("0xb", U256::from(1u64)),
        ];
        assert!(check_supply(&rows, supply).passed);
    }

    #[test]
    fn test_malformed_row_fails_supply() {
        let rows = vec![
            row("0xa", 300),
            SnapshotRow::from_cells("0xb", Some("not a number")),
        ];
        let check = check_supply(&rows, U256::from(300u64));
        assert_eq!(check.total, Some(U256::from(300u64)));
        assert_eq!(check.malformed_rows, 1);
        assert!(!check.passed);
    }
}
