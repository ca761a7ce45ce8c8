use std::fs;
use std::path::Path;

use gamelist_core::{FieldCatalog, FileKind, MetadataMap, SystemConfig};
use gamelist_db::{GamelistDb, ScanStats, StoreError, scan_collection};

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

fn ids(db: &GamelistDb, collection: &str) -> Vec<(String, FileKind)> {
    let mut out = Vec::new();
    db.for_each_record(collection, |r| {
        let kind = r.kind();
        out.push((r.file_id, kind));
    })
    .unwrap();
    out.sort();
    out
}

#[test]
fn scan_records_games_and_containing_folders() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("a.nes"));
    touch(&root.join("sub/b.nes"));
    touch(&root.join("notes.txt"));
    touch(&root.join("other/readme.txt"));
    fs::create_dir_all(root.join("empty")).unwrap();

    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    let stats = scan_collection(&db, &system).unwrap();

    assert_eq!(
        ids(&db, "nes"),
        vec![
            ("a.nes".to_string(), FileKind::Game),
            ("sub".to_string(), FileKind::Folder),
            ("sub/b.nes".to_string(), FileKind::Game),
        ]
    );
    assert_eq!(
        stats,
        ScanStats {
            games_found: 2,
            folders_found: 1,
            inserted: 3,
        }
    );
}

#[test]
fn containment_propagates_through_every_ancestor() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("roms");
    touch(&root.join("x/y/z/leaf.nes"));
    touch(&root.join("sibling/deeper/nothing.txt"));

    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", &root, &["nes"]);
    let stats = scan_collection(&db, &system).unwrap();

    assert_eq!(
        ids(&db, "nes"),
        vec![
            ("x".to_string(), FileKind::Folder),
            ("x/y".to_string(), FileKind::Folder),
            ("x/y/z".to_string(), FileKind::Folder),
            ("x/y/z/leaf.nes".to_string(), FileKind::Game),
        ]
    );
    assert_eq!(stats.folders_found, 3);
    assert_eq!(stats.games_found, 1);
}

#[test]
fn rescan_keeps_existing_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("a.nes"));

    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    scan_collection(&db, &system).unwrap();

    let mut md = MetadataMap::new(FileKind::Game);
    md.set("name", "Adventure");
    db.put_record("a.nes", "nes", &md).unwrap();

    touch(&root.join("b.nes"));
    let stats = scan_collection(&db, &system).unwrap();
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.games_found, 2);
    assert_eq!(db.get_record("a.nes", "nes").unwrap().metadata, md);
}

#[test]
fn root_without_matches_leaves_table_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("docs/manual.pdf"));

    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    let stats = scan_collection(&db, &system).unwrap();

    assert_eq!(stats, ScanStats::default());
    assert_eq!(db.count("nes").unwrap(), 0);
}

#[test]
fn empty_root_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", dir.path(), &[".nes"]);
    scan_collection(&db, &system).unwrap();
    assert_eq!(db.count("nes").unwrap(), 0);
}

#[test]
fn missing_root_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", dir.path().join("nope"), &[".nes"]);
    assert!(matches!(
        scan_collection(&db, &system),
        Err(StoreError::Io { .. })
    ));
}

#[test]
fn scans_are_scoped_to_their_collection() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("nes/a.nes"));
    touch(&dir.path().join("snes/a.sfc"));

    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    scan_collection(&db, &SystemConfig::new("nes", dir.path().join("nes"), &[".nes"])).unwrap();
    scan_collection(&db, &SystemConfig::new("snes", dir.path().join("snes"), &[".sfc"])).unwrap();

    assert_eq!(db.count("nes").unwrap(), 1);
    assert_eq!(db.count("snes").unwrap(), 1);
}

#[cfg(unix)]
#[test]
fn directory_symlinks_are_not_followed() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("sub").join("b.nes"));
    // a cycle back to the containing directory
    std::os::unix::fs::symlink(root.join("sub"), root.join("sub").join("loop")).unwrap();
    // a symlinked file is still a game
    std::os::unix::fs::symlink(root.join("sub").join("b.nes"), root.join("c.nes")).unwrap();

    let db = GamelistDb::open_memory(FieldCatalog::builtin()).unwrap();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    let stats = scan_collection(&db, &system).unwrap();

    assert_eq!(
        stats,
        ScanStats {
            games_found: 2,
            folders_found: 1,
            inserted: 3,
        }
    );
    assert_eq!(
        ids(&db, "nes"),
        vec![
            ("c.nes".to_string(), FileKind::Game),
            ("sub".to_string(), FileKind::Folder),
            ("sub/b.nes".to_string(), FileKind::Game),
        ]
    );
}
