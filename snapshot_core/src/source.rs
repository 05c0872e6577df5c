use async_trait::async_trait;
use log::info;

use crate::error::SnapshotError;
use crate::helpers::dto::{Snapshot, SnapshotRow};

/// Where the published snapshot comes from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// The block the snapshot was taken at, `None` while it has not been chosen.
    async fn target_block(&self) -> Result<Option<u64>, SnapshotError>;

    /// Holder rows in published order; empty while the snapshot is not out yet.
    async fn holder_rows(&self) -> Result<Vec<SnapshotRow>, SnapshotError>;
}

/// Fetch the target block and holder rows together and freeze them into a [`Snapshot`].
///
/// Both reads must finish before reconciliation can start. A missing block or an empty
/// row set is a precondition failure for the whole run.
pub async fn load_snapshot<S>(source: &S) -> Result<Snapshot, SnapshotError>
where
    S: SnapshotSource + ?Sized,
{
    let (target_block, rows) = tokio::join!(source.target_block(), source.holder_rows());

    let target_block = target_block?.ok_or(SnapshotError::NoTargetBlock)?;
    let rows = rows?;
    if rows.is_empty() {
        return Err(SnapshotError::NoHolderRows);
    }

    info!("{} holders at block #{}", rows.len(), target_block);
    Ok(Snapshot { target_block, rows })
}
