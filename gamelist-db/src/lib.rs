//! SQLite persistence layer for gamelist metadata.
//!
//! Provides the catalog-driven `files` table, record lookups and writes,
//! directory scanning and existence refresh, backed by SQLite (via rusqlite
//! with bundled feature).

pub mod refresh;
pub mod scan;
pub mod schema;
pub mod store;

pub use refresh::{RefreshStats, refresh_existence};
pub use scan::{ScanStats, scan_collection};
pub use schema::{SchemaError, TableSchema};
pub use store::{GamelistDb, StoreError, StoreTransaction};
