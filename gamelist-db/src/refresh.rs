//! Re-check whether recorded files are still on disk.

use gamelist_core::Collection;
use gamelist_core::path::resolve;

use crate::store::{GamelistDb, StoreError};

/// Statistics from an existence refresh.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshStats {
    pub checked: u64,
    pub missing: u64,
}

/// Update the existence flag of every record in `collection`.
///
/// Rows for missing files are kept with the flag cleared; callers decide
/// whether to hide or purge them. All updates commit together.
pub fn refresh_existence(
    db: &GamelistDb,
    collection: &dyn Collection,
) -> Result<RefreshStats, StoreError> {
    let root = collection.root_path();
    let mut stats = RefreshStats::default();

    let tx = db.transaction()?;
    for id in db.file_ids(collection.name())? {
        let exists = resolve(&id, root).exists();
        db.set_exists(&id, collection.name(), exists)?;
        stats.checked += 1;
        if !exists {
            log::debug!("{id} is missing from {}", root.display());
            stats.missing += 1;
        }
    }
    tx.commit()?;

    log::info!(
        "{}: checked {} records, {} missing",
        collection.name(),
        stats.checked,
        stats.missing
    );
    Ok(stats)
}
