use thiserror::Error;

use gamelist_core::CatalogError;
use gamelist_db::StoreError;
use gamelist_xml::InterchangeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings file missing or invalid
    #[error("Config error: {0}")]
    Config(String),

    /// System name not present in the settings file
    #[error("Unknown system: {0}")]
    UnknownSystem(String),

    /// Bad command-line value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Gamelist error: {0}")]
    Interchange(#[from] InterchangeError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn unknown_system(msg: impl Into<String>) -> Self {
        Self::UnknownSystem(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
