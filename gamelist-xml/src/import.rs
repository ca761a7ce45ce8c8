//! Merge a gamelist file into the store.

use std::path::Path;

use gamelist_core::path::{file_id, rebase_reference, resolve};
use gamelist_core::{Collection, FieldCatalog, FileKind, MetadataMap, normalize_date};
use gamelist_db::GamelistDb;

use crate::document::{Element, load_document};
use crate::error::InterchangeError;
use crate::ROOT_TAG;

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Entries written to the store.
    pub imported: u64,
    /// Entries whose path does not exist on disk.
    pub skipped_missing: u64,
    /// Entries without a usable `path`.
    pub skipped_invalid: u64,
    /// Imported entries that have an empty `name`.
    pub unnamed: u64,
}

/// Read `source` and write one record per `game`/`folder` entry whose file
/// exists, replacing any stored record with the same key.
///
/// Games are processed before folders. Fields the catalog does not declare
/// for the entry's kind are ignored; declared fields missing from the entry
/// take their catalog default. All writes happen in one transaction, so a
/// store failure leaves the database unchanged.
pub fn import_gamelist(
    db: &GamelistDb,
    collection: &dyn Collection,
    source: &Path,
) -> Result<ImportStats, InterchangeError> {
    log::info!(
        "Appending gamelist file \"{}\" to database (system: {})",
        source.display(),
        collection.name()
    );

    let document = load_document(source)?;
    let list = document.child(ROOT_TAG).ok_or_else(|| {
        InterchangeError::Structure(format!(
            "<{ROOT_TAG}> not found in {}",
            source.display()
        ))
    })?;

    let root = collection.root_path();
    let mut stats = ImportStats::default();
    let tx = db.transaction()?;

    for kind in FileKind::ALL {
        for entry in list.children_named(kind.tag()) {
            let path_text = entry.child_text("path").map(str::trim).unwrap_or("");
            if path_text.is_empty() {
                log::warn!("<{}> entry without a path in {}, ignoring", kind, source.display());
                stats.skipped_invalid += 1;
                continue;
            }

            let path = resolve(path_text, root);
            if !path.exists() {
                log::warn!("File \"{}\" does not exist, ignoring", path.display());
                stats.skipped_missing += 1;
                continue;
            }

            let metadata = entry_metadata(entry, kind, db.catalog(), root);
            let id = file_id(&path, root);
            if metadata.name().is_empty() {
                log::warn!("{kind} \"{id}\" has no name");
                stats.unnamed += 1;
            }

            db.put_record(&id, collection.name(), &metadata)?;
            stats.imported += 1;
        }
    }

    tx.commit()?;

    if stats.skipped_missing > 0 {
        log::warn!(
            "{} entries in {} refer to missing files",
            stats.skipped_missing,
            source.display()
        );
    }
    log::info!(
        "Imported {} entries into {}",
        stats.imported,
        collection.name()
    );
    Ok(stats)
}

/// Catalog defaults for `kind`, overridden by each declared field present
/// in `entry`.
fn entry_metadata(
    entry: &Element,
    kind: FileKind,
    catalog: &FieldCatalog,
    root: &Path,
) -> MetadataMap {
    let mut metadata = MetadataMap::with_defaults(kind, catalog);
    for decl in catalog.fields(kind) {
        let Some(child) = entry.child(&decl.key) else {
            continue;
        };
        let value = if decl.field_type.is_path() {
            rebase_reference(&child.text, root)
        } else if decl.field_type.is_temporal() {
            normalize_date(&child.text)
        } else {
            child.text.clone()
        };
        metadata.set(decl.key.as_str(), value);
    }
    metadata
}
