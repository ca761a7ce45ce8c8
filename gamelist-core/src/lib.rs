//! Core types for the gamelist metadata store.
//!
//! Defines the field catalog, records and their metadata maps, the
//! collection abstraction, and the path helpers that turn filesystem paths
//! into collection-relative file ids.

pub mod catalog;
pub mod collection;
pub mod error;
pub mod metadata;
pub mod path;

pub use catalog::{FieldCatalog, FieldDecl, FieldType, normalize_date};
pub use collection::{Collection, SystemConfig};
pub use error::CatalogError;
pub use metadata::{FileKind, MetadataMap, Record};
