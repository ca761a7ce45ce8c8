use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamelist_core::Collection;
use gamelist_db::scan_collection;

use super::Context;
use crate::CliError;

pub(crate) fn run_scan(ctx: &Context, system_name: &str) -> Result<(), CliError> {
    let system = ctx.system(system_name)?;
    let db = ctx.open_db()?;

    log::info!(
        "Scanning {} ({})",
        system.name().if_supports_color(Stdout, |t| t.bold()),
        system.root_path().display().if_supports_color(Stdout, |t| t.cyan()),
    );
    let stats = scan_collection(&db, system)?;

    log::info!(
        "  {} games, {} folders found; {} new records",
        stats.games_found,
        stats.folders_found,
        stats.inserted.if_supports_color(Stdout, |t| t.green()),
    );
    db.close()?;
    Ok(())
}
