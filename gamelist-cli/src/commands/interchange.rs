use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamelist_xml::{export_gamelist, import_gamelist};

use super::Context;
use crate::CliError;

pub(crate) fn run_import(
    ctx: &Context,
    system_name: &str,
    file: Option<PathBuf>,
) -> Result<(), CliError> {
    let system = ctx.system(system_name)?;
    let source = file.unwrap_or_else(|| system.gamelist_path());
    let db = ctx.open_db()?;

    let stats = import_gamelist(&db, system, &source)?;

    log::info!(
        "{} {} entries",
        "Imported".if_supports_color(Stdout, |t| t.green()),
        stats.imported,
    );
    if stats.skipped_missing > 0 {
        log::info!(
            "  {} entries skipped (file not found)",
            stats.skipped_missing.if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    if stats.skipped_invalid > 0 {
        log::info!(
            "  {} entries skipped (no path)",
            stats.skipped_invalid.if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    if stats.unnamed > 0 {
        log::info!(
            "  {} entries have no name",
            stats.unnamed.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    db.close()?;
    Ok(())
}

pub(crate) fn run_export(
    ctx: &Context,
    system_name: &str,
    file: Option<PathBuf>,
) -> Result<(), CliError> {
    let system = ctx.system(system_name)?;
    let dest = file.unwrap_or_else(|| system.gamelist_path());
    let db = ctx.open_db()?;

    let written = export_gamelist(&db, system, &dest)?;
    log::info!(
        "{} {} entries to {}",
        "Exported".if_supports_color(Stdout, |t| t.green()),
        written,
        dest.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    db.close()?;
    Ok(())
}
