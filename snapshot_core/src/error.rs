use thiserror::Error;

/// Failure reported by a ledger accessor.
///
/// `Query` is scoped to a single read (bad address, timeout, pruned state) and is
/// recovered by the caller. `Unavailable` means the accessor itself can no longer be
/// used and the run must stop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger query failed: {0}")]
    Query(String),
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::Unavailable(_))
    }
}

/// Claimed balance text that cannot be turned into an exact base-unit amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("negative amount: {0}")]
    Negative(String),
    #[error("not a number: {0}")]
    Invalid(String),
    #[error("not a whole number of base units: {0}")]
    Fractional(String),
    #[error("amount out of range: {0}")]
    Overflow(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Token endpoint rejected the request ({status}): {message}")]
    TokenEndpoint { status: u16, message: String },
    #[error("Stored token has no refresh token")]
    MissingRefreshToken,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while loading the snapshot from its source.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("No block found in spreadsheet, please wait till a block is chosen")]
    NoTargetBlock,
    #[error("No data found. Wait for the snapshot")]
    NoHolderRows,
    #[error("The API returned an error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Fatal outcome of a validation run. Per-holder and identity query failures never
/// surface here; they are folded into the report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ledger accessor failed: {0}")]
    LedgerUnavailable(String),
    #[error("Snapshot has no holder rows")]
    NoHolderRows,
}

pub type LedgerResult<T> = Result<T, LedgerError>;
