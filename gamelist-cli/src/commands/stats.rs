use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::Context;
use crate::CliError;

pub(crate) fn run_stats(ctx: &Context) -> Result<(), CliError> {
    if !ctx.db_path.exists() {
        log::warn!("No database found at {}", ctx.db_path.display());
        log::info!("Run 'gamelist scan <system>' to create one.");
        return Ok(());
    }
    let db = ctx.open_db()?;

    log::info!(
        "{}",
        "Gamelist Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", ctx.db_path.display());
    crate::log_blank();

    let collections = db.collection_ids()?;
    if collections.is_empty() {
        log::info!("  {}", "No records".if_supports_color(Stdout, |t| t.dimmed()));
    }
    for collection in &collections {
        let total = db.count(collection)?;
        let missing = db.count_missing(collection)?;
        if missing > 0 {
            log::info!(
                "  {:<12} {:>8} records {}",
                collection.if_supports_color(Stdout, |t| t.bold()),
                total,
                format!("({missing} missing)").if_supports_color(Stdout, |t| t.yellow()),
            );
        } else {
            log::info!(
                "  {:<12} {:>8} records",
                collection.if_supports_color(Stdout, |t| t.bold()),
                total,
            );
        }
    }

    db.close()?;
    Ok(())
}
