//! Gamelist XML interchange: import entries into a [`GamelistDb`] and
//! export stored records back out.
//!
//! A gamelist file has a single `<gameList>` root holding `<game>` and
//! `<folder>` entries. Each entry has a `<path>` child plus one child per
//! metadata field.
//!
//! [`GamelistDb`]: gamelist_db::GamelistDb

pub mod document;
pub mod error;
pub mod export;
pub mod import;

pub use error::InterchangeError;
pub use export::export_gamelist;
pub use import::{ImportStats, import_gamelist};

/// Name of the root element of a gamelist file.
pub const ROOT_TAG: &str = "gameList";
