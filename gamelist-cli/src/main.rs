//! gamelist CLI
//!
//! Command-line interface for scanning game collections into a metadata
//! database and exchanging that metadata with gamelist.xml files.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::io::Write;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands};
use commands::Context;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::load(cli.config.as_deref(), cli.db)?;

    match cli.command {
        Commands::Scan { system } => commands::scan::run_scan(&ctx, &system),
        Commands::Refresh { system } => commands::refresh::run_refresh(&ctx, &system),
        Commands::Import { system, file } => {
            commands::interchange::run_import(&ctx, &system, file)
        }
        Commands::Export { system, file } => {
            commands::interchange::run_export(&ctx, &system, file)
        }
        Commands::Show { system, path } => commands::records::run_show(&ctx, &system, &path),
        Commands::Set {
            system,
            path,
            fields,
            folder,
        } => commands::records::run_set(&ctx, &system, &path, &fields, folder),
        Commands::Stats => commands::stats::run_stats(&ctx),
        Commands::Systems => commands::systems::run_systems(&ctx),
    }
}

/// Install `env_logger` on stdout. Info messages are printed bare since
/// they are the command's normal output; `RUST_LOG` overrides the level.
fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            log::Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            log::Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.bright_red()),
                record.args()
            ),
            level => writeln!(
                buf,
                "{} [{}] {}",
                level.if_supports_color(Stdout, |t| t.dimmed()),
                record.target(),
                record.args()
            ),
        })
        .init();
}

/// Print an empty line through the logger so `--quiet` suppresses it too.
pub(crate) fn log_blank() {
    log::info!("");
}
