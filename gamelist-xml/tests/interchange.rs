use std::fs;
use std::path::Path;

use gamelist_core::{FieldCatalog, FileKind, MetadataMap, Record, SystemConfig};
use gamelist_db::{GamelistDb, scan_collection};
use gamelist_xml::document::load_document;
use gamelist_xml::{ImportStats, InterchangeError, export_gamelist, import_gamelist};

fn db() -> GamelistDb {
    GamelistDb::open_memory(FieldCatalog::builtin()).unwrap()
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"rom").unwrap();
}

fn records(db: &GamelistDb, collection: &str) -> Vec<Record> {
    let mut out = Vec::new();
    db.for_each_record(collection, |r| out.push(r)).unwrap();
    out.sort_by(|a, b| a.file_id.cmp(&b.file_id));
    out
}

#[test]
fn missing_paths_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.nes"));
    let source = root.join("gamelist.xml");
    fs::write(
        &source,
        r#"<?xml version="1.0"?>
<gameList>
    <game><path>./a.nes</path><name>A</name></game>
    <game><path>./gone.nes</path><name>Gone</name></game>
</gameList>"#,
    )
    .unwrap();

    let db = db();
    let system = SystemConfig::new("nes", root, &[".nes"]);
    let stats = import_gamelist(&db, &system, &source).unwrap();

    assert_eq!(
        stats,
        ImportStats {
            imported: 1,
            skipped_missing: 1,
            skipped_invalid: 0,
            unnamed: 0,
        }
    );
    assert_eq!(db.count("nes").unwrap(), 1);
    assert_eq!(db.get_record("a.nes", "nes").unwrap().metadata.name(), "A");
}

#[test]
fn absent_fields_take_catalog_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.nes"));
    fs::create_dir_all(root.join("sub")).unwrap();
    let source = root.join("gamelist.xml");
    fs::write(
        &source,
        r#"<gameList>
    <folder><path>./sub</path><name>Sub</name><players>4</players></folder>
    <game><path>./a.nes</path><name>A</name><genre>Platform</genre><unknowntag>x</unknowntag></game>
</gameList>"#,
    )
    .unwrap();

    let db = db();
    let system = SystemConfig::new("nes", root, &[".nes"]);
    import_gamelist(&db, &system, &source).unwrap();

    let game = db.get_record("a.nes", "nes").unwrap();
    assert_eq!(game.kind(), FileKind::Game);
    assert_eq!(game.metadata.get("genre"), Some("Platform"));
    assert_eq!(game.metadata.get("developer"), Some("unknown"));
    assert_eq!(game.metadata.get("players"), Some("1"));

    // players is not a folder field
    let folder = db.get_record("sub", "nes").unwrap();
    assert_eq!(folder.kind(), FileKind::Folder);
    assert_eq!(folder.metadata.name(), "Sub");
    assert_eq!(folder.metadata.get("players"), None);
}

#[test]
fn import_replaces_existing_records() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.nes"));

    let db = db();
    let mut md = MetadataMap::with_defaults(FileKind::Game, db.catalog());
    md.set("name", "Old");
    md.set("desc", "stale");
    db.put_record("a.nes", "nes", &md).unwrap();

    let source = root.join("gamelist.xml");
    fs::write(
        &source,
        "<gameList><game><path>a.nes</path><name>New</name></game></gameList>",
    )
    .unwrap();

    let system = SystemConfig::new("nes", root, &[".nes"]);
    import_gamelist(&db, &system, &source).unwrap();

    let record = db.get_record("a.nes", "nes").unwrap();
    assert_eq!(record.metadata.name(), "New");
    assert_eq!(record.metadata.get("desc"), Some(""));
}

#[test]
fn image_paths_and_dates_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("a.nes"));
    let image = dir.path().join("media").join("a.png");
    let source = root.join("gamelist.xml");
    fs::write(
        &source,
        format!(
            "<gameList><game>\
             <path>./a.nes</path><name>A</name>\
             <image>{}</image>\
             <thumbnail>./images/a-thumb.png</thumbnail>\
             <releasedate>1986-08-06</releasedate>\
             <lastplayed>20240102T030405</lastplayed>\
             </game></gameList>",
            image.display()
        ),
    )
    .unwrap();

    let db = db();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    import_gamelist(&db, &system, &source).unwrap();

    let md = db.get_record("a.nes", "nes").unwrap().metadata;
    assert_eq!(md.get("image"), Some("../media/a.png"));
    assert_eq!(md.get("thumbnail"), Some("images/a-thumb.png"));
    assert_eq!(md.get("releasedate"), Some("19860806T000000"));
    assert_eq!(md.get("lastplayed"), Some("20240102T030405"));
}

#[test]
fn entries_without_path_or_name() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.nes"));
    let source = root.join("gamelist.xml");
    fs::write(
        &source,
        "<gameList>\
         <game><name>No path</name></game>\
         <game><path>./a.nes</path></game>\
         </gameList>",
    )
    .unwrap();

    let db = db();
    let system = SystemConfig::new("nes", root, &[".nes"]);
    let stats = import_gamelist(&db, &system, &source).unwrap();

    assert_eq!(stats.imported, 1);
    assert_eq!(stats.skipped_invalid, 1);
    assert_eq!(stats.unnamed, 1);
    assert_eq!(db.get_record("a.nes", "nes").unwrap().metadata.name(), "");
}

#[test]
fn missing_source_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let db = db();
    let system = SystemConfig::new("nes", dir.path(), &[".nes"]);
    let err = import_gamelist(&db, &system, &dir.path().join("gamelist.xml")).unwrap_err();
    assert!(matches!(err, InterchangeError::SourceNotFound(_)));
}

#[test]
fn malformed_source_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.nes"));
    let source = root.join("gamelist.xml");
    fs::write(&source, "<gameList><game><path>./a.nes</path>").unwrap();

    let db = db();
    let system = SystemConfig::new("nes", root, &[".nes"]);
    let err = import_gamelist(&db, &system, &source).unwrap_err();
    assert!(err.is_parse_error(), "{err}");
    assert_eq!(db.count("nes").unwrap(), 0);
}

#[test]
fn wrong_root_element_is_a_structure_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("gamelist.xml");
    fs::write(&source, "<datafile><game name=\"x\"/></datafile>").unwrap();

    let db = db();
    let system = SystemConfig::new("nes", dir.path(), &[".nes"]);
    let err = import_gamelist(&db, &system, &source).unwrap_err();
    assert!(matches!(err, InterchangeError::Structure(_)));
}

#[test]
fn export_writes_absolute_paths_and_stored_fields() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("sub").join("b.nes"));

    let db = db();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    let mut md = MetadataMap::new(FileKind::Game);
    md.set("name", "B & Co");
    md.set("rating", "0.5");
    db.put_record("sub/b.nes", "nes", &md).unwrap();
    db.insert_ignore("sub", "nes", FileKind::Folder).unwrap();
    // another collection's records stay out
    db.put_record("x.sfc", "snes", &md).unwrap();

    let dest = dir.path().join("out").join("gamelist.xml");
    let written = export_gamelist(&db, &system, &dest).unwrap();
    assert_eq!(written, 2);

    let doc = load_document(&dest).unwrap();
    let list = doc.child("gameList").unwrap();
    assert_eq!(list.children.len(), 2);

    let game = list.child("game").unwrap();
    let expected = root.join("sub").join("b.nes");
    assert_eq!(game.child_text("path"), Some(expected.to_string_lossy().as_ref()));
    assert_eq!(game.child_text("name"), Some("B & Co"));
    assert_eq!(game.child_text("rating"), Some("0.5"));
    // NULL columns are omitted
    assert_eq!(game.child_text("desc"), None);

    let names: Vec<&str> = game.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["path", "name", "rating"]);

    let folder = list.child("folder").unwrap();
    assert_eq!(folder.child_text("name"), Some(""));
    assert_eq!(folder.child_text("players"), None);
}

#[test]
fn export_then_import_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("a.nes"));
    touch(&root.join("sub").join("b.nes"));
    touch(&root.join("sub").join("deep").join("c.nes"));

    let source_db = db();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    scan_collection(&source_db, &system).unwrap();

    let mut md = MetadataMap::with_defaults(FileKind::Game, source_db.catalog());
    md.set("name", "Alpha <1>");
    md.set("desc", "Line one\nLine two");
    md.set("image", "images/a.png");
    md.set("rating", "0.8");
    md.set("releasedate", "19851018T000000");
    md.set("players", "2");
    source_db.put_record("a.nes", "nes", &md).unwrap();

    let mut folder = MetadataMap::with_defaults(FileKind::Folder, source_db.catalog());
    folder.set("name", "Sub");
    source_db.put_record("sub", "nes", &folder).unwrap();

    let file = dir.path().join("gamelist.xml");
    export_gamelist(&source_db, &system, &file).unwrap();

    let target_db = db();
    let stats = import_gamelist(&target_db, &system, &file).unwrap();
    assert_eq!(stats.imported, 5);
    assert_eq!(stats.skipped_missing, 0);

    assert_eq!(records(&target_db, "nes"), records(&source_db, "nes"));
}

#[test]
fn whitespace_in_values_survives_export_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nes");
    touch(&root.join("a.nes"));

    let source_db = db();
    let system = SystemConfig::new("nes", &root, &[".nes"]);
    let mut md = MetadataMap::with_defaults(FileKind::Game, source_db.catalog());
    md.set("name", "Alpha");
    md.set("desc", "  indented first line\n  second line\n");
    md.set("publisher", " ");
    source_db.put_record("a.nes", "nes", &md).unwrap();

    let file = dir.path().join("gamelist.xml");
    export_gamelist(&source_db, &system, &file).unwrap();

    let target_db = db();
    import_gamelist(&target_db, &system, &file).unwrap();

    let imported = target_db.get_record("a.nes", "nes").unwrap().metadata;
    assert_eq!(imported.get("desc"), Some("  indented first line\n  second line\n"));
    assert_eq!(imported.get("publisher"), Some(" "));
    assert_eq!(records(&target_db, "nes"), records(&source_db, "nes"));
}
