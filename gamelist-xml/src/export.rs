//! Write a collection's records out as a gamelist file.

use std::path::Path;

use gamelist_core::Collection;
use gamelist_core::path::{generic_string, resolve};
use gamelist_db::GamelistDb;

use crate::ROOT_TAG;
use crate::document::{Element, save_document};
use crate::error::InterchangeError;

/// Write every record of `collection` to `dest` and return the number of
/// entries written.
///
/// Each record becomes a `game` or `folder` element holding its absolute
/// `path` followed by one child per non-NULL metadata column, in storage
/// order. The file is only replaced once it has been fully written.
pub fn export_gamelist(
    db: &GamelistDb,
    collection: &dyn Collection,
    dest: &Path,
) -> Result<usize, InterchangeError> {
    let root = collection.root_path();
    let columns = db.columns();
    let mut list = Element::new(ROOT_TAG);

    let count = db.for_each_record(collection.name(), |record| {
        let mut entry = Element::new(record.kind().tag());
        let path = resolve(&record.file_id, root);
        entry.push(Element::with_text("path", &generic_string(&path)));

        for column in columns {
            if let Some(value) = record.metadata.get(column) {
                entry.push(Element::with_text(column, value));
            }
        }
        list.push(entry);
    })?;

    let mut document = Element::document();
    document.push(list);
    save_document(&document, dest)?;

    log::info!(
        "Exported {count} entries from {} to {}",
        collection.name(),
        dest.display()
    );
    Ok(count)
}
