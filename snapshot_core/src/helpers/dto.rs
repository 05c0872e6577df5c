use alloy_primitives::U256;
use serde::Serialize;

use super::amount::parse_amount;
use super::serde_utils::{serialize_decimal, serialize_decimal_opt};
use super::utils::normalize_address;
use crate::error::AmountError;

/// Claimed balance as published in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimedBalance {
    Exact(U256),
    Malformed { raw: String, reason: AmountError },
}

impl ClaimedBalance {
    pub fn parse(raw: &str) -> Self {
        match parse_amount(raw) {
            Ok(amount) => ClaimedBalance::Exact(amount),
            Err(reason) => ClaimedBalance::Malformed {
                raw: raw.to_string(),
                reason,
            },
        }
    }

    pub fn amount(&self) -> Option<U256> {
        match self {
            ClaimedBalance::Exact(amount) => Some(*amount),
            ClaimedBalance::Malformed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub address: String,
    pub claimed_balance: ClaimedBalance,
}

impl SnapshotRow {
    pub fn new(address: &str, claimed_balance: U256) -> Self {
        Self {
            address: normalize_address(address),
            claimed_balance: ClaimedBalance::Exact(claimed_balance),
        }
    }

    /// Build a row from spreadsheet cells; a missing or unparsable balance is kept as malformed.
    pub fn from_cells(address: &str, claimed_balance: Option<&str>) -> Self {
        Self {
            address: normalize_address(address),
            claimed_balance: ClaimedBalance::parse(claimed_balance.unwrap_or_default()),
        }
    }
}

/// Everything the snapshot claims: the block it was taken at and the holder rows, in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub target_block: u64,
    pub rows: Vec<SnapshotRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenIdentity {
    pub name: String,
    pub symbol: String,
}

/// Constants the snapshot is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectations {
    pub identity: TokenIdentity,
    pub total_supply: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolderCheckResult {
    pub address: String,
    #[serde(serialize_with = "serialize_decimal_opt")]
    pub claimed_balance: Option<U256>,
    #[serde(serialize_with = "serialize_decimal_opt")]
    pub on_chain_balance: Option<U256>,
    pub is_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyCheck {
    #[serde(serialize_with = "serialize_decimal_opt")]
    pub total: Option<U256>,
    #[serde(serialize_with = "serialize_decimal")]
    pub expected: U256,
    pub malformed_rows: usize,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityCheck {
    pub name_passed: bool,
    pub symbol_passed: bool,
    pub observed_name: Option<String>,
    pub observed_symbol: Option<String>,
}

impl IdentityCheck {
    pub fn passed(&self) -> bool {
        self.name_passed && self.symbol_passed
    }
}

/// Per-holder outcomes plus the two totals accumulated while reconciling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub results: Vec<HolderCheckResult>,
    pub claimed_total: Option<U256>,
    pub on_chain_total: Option<U256>,
}

/// Terminal artifact of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub target_block: u64,
    pub supply_check_passed: bool,
    pub identity_check_passed: bool,
    pub holder_results: Vec<HolderCheckResult>,
    pub overall_passed: bool,
    pub supply: SupplyCheck,
    pub identity: IdentityCheck,
    #[serde(serialize_with = "serialize_decimal_opt")]
    pub claimed_total: Option<U256>,
    #[serde(serialize_with = "serialize_decimal_opt")]
    pub on_chain_total: Option<U256>,
    pub totals_consistent: bool,
}

impl ValidationReport {
    pub fn holders_passed(&self) -> bool {
        self.holder_results.iter().all(|result| result.is_match)
    }

    pub fn mismatched_holders(&self) -> impl Iterator<Item = &HolderCheckResult> {
        self.holder_results.iter().filter(|result| !result.is_match)
    }
}
