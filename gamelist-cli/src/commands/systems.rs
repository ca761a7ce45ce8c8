use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamelist_core::Collection;

use super::Context;
use crate::CliError;
use crate::settings::settings_path;

pub(crate) fn run_systems(ctx: &Context) -> Result<(), CliError> {
    if ctx.settings.systems.is_empty() {
        log::warn!("No systems configured");
        log::info!("Add [[system]] entries to {}", settings_path().display());
        return Ok(());
    }

    for system in &ctx.settings.systems {
        let root = system.root_path();
        log::info!(
            "{} {}{}",
            system.name().if_supports_color(Stdout, |t| t.bold()),
            root.display().if_supports_color(Stdout, |t| t.cyan()),
            if root.is_dir() {
                String::new()
            } else {
                format!(" {}", "(not found)".if_supports_color(Stdout, |t| t.red()))
            },
        );
        log::info!("    Extensions: {}", system.extensions().join(", "));
        log::info!("    Gamelist: {}", system.gamelist_path().display());
    }
    Ok(())
}
