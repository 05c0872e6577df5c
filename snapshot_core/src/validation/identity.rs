use log::{debug, warn};

use crate::error::{LedgerError, ValidationError};
use crate::helpers::dto::{IdentityCheck, TokenIdentity};
use crate::ledger::LedgerAccessor;

/// Check the token's name and symbol at the chain head against the expected identity.
///
/// A failed or mismatched read is a failed sub-check, not an error. Only a ledger that
/// has become unavailable aborts.
pub async fn check_identity<L>(
    ledger: &L,
    expected: &TokenIdentity,
) -> Result<IdentityCheck, ValidationError>
where
    L: LedgerAccessor + ?Sized,
{
    let (name, symbol) = tokio::join!(ledger.token_name(), ledger.token_symbol());

    let observed_name = observed("name", name)?;
    let observed_symbol = observed("symbol", symbol)?;

    let check = IdentityCheck {
        name_passed: observed_name.as_deref() == Some(expected.name.as_str()),
        symbol_passed: observed_symbol.as_deref() == Some(expected.symbol.as_str()),
        observed_name,
        observed_symbol,
    };

    debug!("- Validating token: {}", check.passed());
    Ok(check)
}

fn observed(
    field: &str,
    result: Result<String, LedgerError>,
) -> Result<Option<String>, ValidationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(LedgerError::Unavailable(msg)) => Err(ValidationError::LedgerUnavailable(msg)),
        Err(LedgerError::Query(msg)) => {
            warn!("Failed to read token {}: {}", field, msg);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::testing::MockLedger;

    fn expected() -> TokenIdentity {
        TokenIdentity {
            name: "TrueDeck".to_string(),
            symbol: "TDP".to_string(),
        }
    }

    #[tokio::test]
    async fn test_identity_matches() {
        let ledger = MockLedger::new();
        let check = check_identity(&ledger, &expected()).await.unwrap();

        assert!(check.name_passed);
        assert!(check.symbol_passed);
        assert!(check.passed());
    }

    #[tokio::test]
    async fn test_symbol_mismatch() {
        let ledger =
            MockLedger::new().with_identity(Ok("TrueDeck".to_string()), Ok("tdp".to_string()));
        let check = check_identity(&ledger, &expected()).await.unwrap();

        assert!(check.name_passed);
        assert!(!check.symbol_passed);
        assert!(!check.passed());
        assert_eq!(check.observed_symbol.as_deref(), Some("tdp"));
    }

    #[tokio::test]
    async fn test_query_error_fails_sub_check() {
        let ledger = MockLedger::new().with_identity(
            Err(LedgerError::Query("execution reverted".to_string())),
            Ok("TDP".to_string()),
        );
        let check = check_identity(&ledger, &expected()).await.unwrap();

        assert!(!check.name_passed);
        assert!(check.symbol_passed);
        assert_eq!(check.observed_name, None);
    }

    #[tokio::test]
    async fn test_unavailable_ledger_aborts() {
        let ledger = MockLedger::new().with_identity(
            Ok("TrueDeck".to_string()),
            Err(LedgerError::Unavailable("connection refused".to_string())),
        );
        let err = check_identity(&ledger, &expected()).await.unwrap_err();

        assert_eq!(
            err,
            ValidationError::LedgerUnavailable("connection refused".to_string())
        );
    }
}
