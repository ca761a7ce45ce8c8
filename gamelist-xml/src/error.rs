use std::path::PathBuf;

use gamelist_db::StoreError;

/// Errors that can occur while reading or writing a gamelist file.
#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    #[error("Gamelist file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Invalid gamelist structure: {0}")]
    Structure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InterchangeError {
    /// True for errors caused by the content of the input file.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Malformed(_))
    }
}
