pub mod error;
pub mod helpers;
pub mod ledger;
pub mod sheets;
pub mod source;
pub mod validation;

pub use error::{AuthError, LedgerError, SnapshotError, ValidationError};
pub use helpers::dto::{
    ClaimedBalance, Expectations, HolderCheckResult, Snapshot, SnapshotRow, TokenIdentity,
    ValidationReport,
};
pub use ledger::LedgerAccessor;
pub use source::{load_snapshot, SnapshotSource};
pub use validation::{validate_snapshot, ValidationOptions};
