//! Populate the store from a collection's directory tree.
//!
//! Files with an allowed extension become game records. A directory becomes
//! a folder record when anything beneath it, at any depth, qualified. The
//! collection root itself is never recorded. Symlinked directories are not
//! followed; symlinks to files count like the files they point to.

use std::fs::FileType;
use std::path::{Path, PathBuf};

use gamelist_core::path::file_id;
use gamelist_core::{Collection, FileKind};

use crate::store::{GamelistDb, StoreError};

/// Statistics from a scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    /// Matching files seen on disk.
    pub games_found: u64,
    /// Directories containing at least one matching file.
    pub folders_found: u64,
    /// Rows actually added (entries already in the store are left as-is).
    pub inserted: u64,
}

/// Walk the collection root and add a bare record for every game and
/// qualifying folder not already stored.
///
/// Runs in a single transaction: either every new row becomes visible or,
/// on error, none does. Existing rows keep their metadata.
pub fn scan_collection(
    db: &GamelistDb,
    collection: &dyn Collection,
) -> Result<ScanStats, StoreError> {
    let root = collection.root_path();
    log::info!(
        "Scanning {} for new files in {}",
        collection.name(),
        root.display()
    );

    let mut scanner = Scanner {
        db,
        collection,
        stats: ScanStats::default(),
    };

    let entries = read_sorted(root).map_err(|e| StoreError::Io {
        path: root.display().to_string(),
        source: e,
    })?;

    let tx = db.transaction()?;
    scanner.visit_entries(entries)?;
    tx.commit()?;

    let stats = scanner.stats;
    log::info!(
        "{}: {} games, {} folders found, {} new records",
        collection.name(),
        stats.games_found,
        stats.folders_found,
        stats.inserted
    );
    Ok(stats)
}

struct Scanner<'a> {
    db: &'a GamelistDb,
    collection: &'a dyn Collection,
    stats: ScanStats,
}

impl Scanner<'_> {
    /// Process the entries of one directory. Returns `true` if any of them
    /// is a game or a directory containing one.
    fn visit_entries(&mut self, entries: Vec<(PathBuf, FileType)>) -> Result<bool, StoreError> {
        let mut has_a_file = false;

        for (path, file_type) in entries {
            if file_type.is_symlink() && path.is_dir() {
                log::warn!("Not following directory symlink {}", path.display());
                continue;
            }

            if file_type.is_dir() {
                if self.visit_dir(&path)? {
                    self.add(&path, FileKind::Folder)?;
                    self.stats.folders_found += 1;
                    has_a_file = true;
                }
                continue;
            }

            if !self.collection.matches_extension(&path) {
                continue;
            }

            self.add(&path, FileKind::Game)?;
            self.stats.games_found += 1;
            has_a_file = true;
        }

        Ok(has_a_file)
    }

    fn visit_dir(&mut self, dir: &Path) -> Result<bool, StoreError> {
        match read_sorted(dir) {
            Ok(entries) => self.visit_entries(entries),
            Err(e) => {
                log::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                Ok(false)
            }
        }
    }

    fn add(&mut self, path: &Path, kind: FileKind) -> Result<(), StoreError> {
        let id = file_id(path, self.collection.root_path());
        if self.db.insert_ignore(&id, self.collection.name(), kind)? {
            self.stats.inserted += 1;
        }
        Ok(())
    }
}

/// Directory entries with their (unfollowed) file types, sorted by path so
/// scans are deterministic.
fn read_sorted(dir: &Path) -> std::io::Result<Vec<(PathBuf, FileType)>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| {
            let entry = entry?;
            Ok((entry.path(), entry.file_type()?))
        })
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
