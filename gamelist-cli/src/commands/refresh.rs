use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamelist_db::refresh_existence;

use super::Context;
use crate::CliError;

pub(crate) fn run_refresh(ctx: &Context, system_name: &str) -> Result<(), CliError> {
    let system = ctx.system(system_name)?;
    let db = ctx.open_db()?;

    let stats = refresh_existence(&db, system)?;
    if stats.missing > 0 {
        log::info!(
            "Checked {} records, {} missing",
            stats.checked,
            stats.missing.if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::info!(
            "Checked {} records, {}",
            stats.checked,
            "all present".if_supports_color(Stdout, |t| t.green()),
        );
    }
    db.close()?;
    Ok(())
}
