//! Settings file: database location, optional field catalog and the
//! configured systems.
//!
//! The file lives at `~/.config/gamelist/settings.toml`. Relative paths in
//! it are taken relative to the directory holding the file, and `~/`
//! expands to the home directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gamelist_core::path::resolve;
use gamelist_core::{FieldCatalog, SystemConfig};

use crate::CliError;

/// Directory holding the settings file and the default database.
pub(crate) fn settings_dir() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("gamelist")
}

/// Canonical path to the settings file: `~/.config/gamelist/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    settings_dir().join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Settings {
    /// Database file. Defaults to `gamelist.db` next to the settings file.
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// YAML field catalog replacing the built-in one.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    #[serde(default, rename = "system")]
    pub systems: Vec<SystemConfig>,

    /// Directory relative paths were resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Settings {
    /// Load the default settings file. A missing file yields empty settings.
    pub(crate) fn load_default() -> Result<Self, CliError> {
        let path = settings_path();
        if !path.exists() {
            log::debug!("No settings file at {}", path.display());
            return Ok(Self {
                base_dir: settings_dir(),
                ..Default::default()
            });
        }
        Self::load(&path)
    }

    /// Load a settings file that must exist.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base_dir).map_err(|e| match e {
            CliError::Config(msg) => CliError::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse settings text, resolving relative paths against `base_dir`.
    pub(crate) fn parse(contents: &str, base_dir: &Path) -> Result<Self, CliError> {
        let mut settings: Settings =
            toml::from_str(contents).map_err(|e| CliError::config(e.to_string()))?;
        settings.base_dir = base_dir.to_path_buf();

        let mut seen = HashSet::new();
        for system in &mut settings.systems {
            if system.name.trim().is_empty() {
                return Err(CliError::config("system with an empty name"));
            }
            if !seen.insert(system.name.clone()) {
                return Err(CliError::config(format!(
                    "system '{}' is configured more than once",
                    system.name
                )));
            }
            system.path = resolve_setting(&system.path, base_dir);
            system.gamelist = system.gamelist.as_ref().map(|p| resolve_setting(p, base_dir));
        }
        settings.database = settings.database.map(|p| resolve_setting(&p, base_dir));
        settings.catalog = settings.catalog.map(|p| resolve_setting(&p, base_dir));
        Ok(settings)
    }

    pub(crate) fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.base_dir.join("gamelist.db"))
    }

    /// The configured catalog, or the built-in one.
    pub(crate) fn load_catalog(&self) -> Result<FieldCatalog, CliError> {
        match &self.catalog {
            Some(path) => {
                log::debug!("Loading field catalog from {}", path.display());
                Ok(FieldCatalog::load(path)?)
            }
            None => Ok(FieldCatalog::builtin()),
        }
    }

    pub(crate) fn system(&self, name: &str) -> Result<&SystemConfig, CliError> {
        self.systems
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CliError::unknown_system(name))
    }
}

fn resolve_setting(path: &Path, base_dir: &Path) -> PathBuf {
    resolve(&path.to_string_lossy(), base_dir)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
