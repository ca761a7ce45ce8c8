pub(crate) mod interchange;
pub(crate) mod records;
pub(crate) mod refresh;
pub(crate) mod scan;
pub(crate) mod stats;
pub(crate) mod systems;

use std::path::{Path, PathBuf};

use gamelist_core::SystemConfig;
use gamelist_db::GamelistDb;

use crate::CliError;
use crate::settings::Settings;

/// Settings plus the resolved database location, shared by every command.
pub(crate) struct Context {
    pub settings: Settings,
    pub db_path: PathBuf,
}

impl Context {
    pub(crate) fn load(config: Option<&Path>, db: Option<PathBuf>) -> Result<Self, CliError> {
        let settings = match config {
            Some(path) => Settings::load(path)?,
            None => Settings::load_default()?,
        };
        let db_path = db.unwrap_or_else(|| settings.database_path());
        Ok(Self { settings, db_path })
    }

    /// Open (creating if needed) the database with the configured catalog.
    pub(crate) fn open_db(&self) -> Result<GamelistDb, CliError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let catalog = self.settings.load_catalog()?;
        log::debug!("Opening database {}", self.db_path.display());
        Ok(GamelistDb::open_with_catalog(&self.db_path, catalog)?)
    }

    pub(crate) fn system(&self, name: &str) -> Result<&SystemConfig, CliError> {
        self.settings.system(name)
    }
}

#[cfg(test)]
#[path = "../tests/commands_tests.rs"]
mod tests;
