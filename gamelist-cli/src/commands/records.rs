use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamelist_core::path::file_id;
use gamelist_core::{Collection, FileKind, MetadataMap};
use gamelist_db::StoreError;

use super::Context;
use crate::CliError;

pub(crate) fn run_show(ctx: &Context, system_name: &str, path: &Path) -> Result<(), CliError> {
    let system = ctx.system(system_name)?;
    let db = ctx.open_db()?;
    let id = file_id(path, system.root_path());
    let record = db.get_record(&id, system.name())?;

    log::info!(
        "{} {}",
        record.file_id.if_supports_color(Stdout, |t| t.bold()),
        format!("({}, {})", record.kind(), record.collection_id)
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if !record.exists {
        log::info!(
            "  {}",
            "file not found on last refresh".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    // Catalog fields first with their labels, then any extra stored columns
    let catalog = db.catalog();
    for decl in catalog.fields(record.kind()) {
        if let Some(value) = record.metadata.get(&decl.key) {
            print_field(decl.label(), value);
        }
    }
    for (key, value) in record.metadata.iter() {
        if catalog.field(record.kind(), key).is_none() {
            print_field(key, value);
        }
    }

    db.close()?;
    Ok(())
}

fn print_field(label: &str, value: &str) {
    let label = format!("{label}:");
    let mut lines = value.lines();
    log::info!(
        "  {:<14} {}",
        label.if_supports_color(Stdout, |t| t.cyan()),
        lines.next().unwrap_or(""),
    );
    for line in lines {
        log::info!("  {:<14} {}", "", line);
    }
}

pub(crate) fn run_set(
    ctx: &Context,
    system_name: &str,
    path: &Path,
    fields: &[(String, String)],
    folder: bool,
) -> Result<(), CliError> {
    let system = ctx.system(system_name)?;
    let db = ctx.open_db()?;
    let id = file_id(path, system.root_path());

    let mut metadata = match db.get_record(&id, system.name()) {
        Ok(record) => record.metadata,
        Err(StoreError::NotFound { .. }) => {
            let kind = if folder { FileKind::Folder } else { FileKind::Game };
            MetadataMap::with_defaults(kind, db.catalog())
        }
        Err(e) => return Err(e.into()),
    };

    for (key, value) in fields {
        if db.catalog().field(metadata.kind(), key).is_none() {
            return Err(CliError::invalid_argument(format!(
                "'{}' is not a {} field",
                key,
                metadata.kind()
            )));
        }
        metadata.set(key.as_str(), value.as_str());
    }

    db.put_record(&id, system.name(), &metadata)?;
    log::info!(
        "{} {} {}",
        "Updated".if_supports_color(Stdout, |t| t.green()),
        metadata.kind(),
        id.if_supports_color(Stdout, |t| t.bold()),
    );
    db.close()?;
    Ok(())
}
