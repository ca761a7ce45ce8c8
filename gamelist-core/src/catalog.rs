//! Declarative metadata field catalog.
//!
//! The catalog lists, per file kind, which metadata fields exist, how they
//! are interpreted, and what value a fresh record starts with. The database
//! layer derives its table shape from [`FieldCatalog::columns`], so adding a
//! field here (or in a YAML catalog file) adds a column on next open.

use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::metadata::FileKind;

/// Compact date format used for stored date/datetime values.
pub const DATE_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Semantic type of a metadata field.
///
/// Values are always stored as text; the type only drives the storage
/// column type and how importers clean up incoming values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    MultilineString,
    ImagePath,
    Int,
    Float,
    /// Float in the range 0.0..=1.0
    Rating,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
}

impl FieldType {
    /// True for types whose values are file references.
    pub fn is_path(&self) -> bool {
        matches!(self, FieldType::ImagePath)
    }

    /// True for date and datetime fields.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub default: Option<String>,
    /// Human-readable label; falls back to `key`.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl FieldDecl {
    pub fn new(key: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            default: None,
            display_name: None,
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.key)
    }

    /// Default value, or the empty string when none is declared.
    pub fn default_value(&self) -> &str {
        self.default.as_deref().unwrap_or("")
    }
}

/// Ordered field lists for game and folder records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub game: Vec<FieldDecl>,
    pub folder: Vec<FieldDecl>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldCatalog {
    /// The standard gamelist field set.
    pub fn builtin() -> Self {
        use FieldType::*;

        let game = vec![
            FieldDecl::new("name", String).with_display_name("name"),
            FieldDecl::new("desc", MultilineString).with_display_name("description"),
            FieldDecl::new("image", ImagePath).with_display_name("image"),
            FieldDecl::new("thumbnail", ImagePath).with_display_name("thumbnail"),
            FieldDecl::new("rating", Rating)
                .with_default("0")
                .with_display_name("rating"),
            FieldDecl::new("releasedate", Date).with_display_name("release date"),
            FieldDecl::new("developer", String)
                .with_default("unknown")
                .with_display_name("developer"),
            FieldDecl::new("publisher", String)
                .with_default("unknown")
                .with_display_name("publisher"),
            FieldDecl::new("genre", String)
                .with_default("unknown")
                .with_display_name("genre"),
            FieldDecl::new("players", Int)
                .with_default("1")
                .with_display_name("players"),
            FieldDecl::new("playcount", Int)
                .with_default("0")
                .with_display_name("play count"),
            FieldDecl::new("lastplayed", DateTime).with_display_name("last played"),
        ];

        let folder = vec![
            FieldDecl::new("name", String).with_display_name("name"),
            FieldDecl::new("desc", MultilineString).with_display_name("description"),
            FieldDecl::new("image", ImagePath).with_display_name("image"),
            FieldDecl::new("thumbnail", ImagePath).with_display_name("thumbnail"),
        ];

        Self { game, folder }
    }

    /// Load a catalog from a YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let catalog: FieldCatalog =
            serde_yml::from_str(&contents).map_err(|e| CatalogError::Parse {
                path: path.display().to_string(),
                source: e,
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that every list is non-empty, declares `name`, and has no
    /// duplicate or blank keys.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for kind in FileKind::ALL {
            let fields = self.fields(kind);
            let mut seen = HashSet::new();
            for decl in fields {
                if decl.key.trim().is_empty() {
                    return Err(CatalogError::invalid(format!(
                        "blank field key in {kind} catalog"
                    )));
                }
                if !seen.insert(decl.key.as_str()) {
                    return Err(CatalogError::invalid(format!(
                        "duplicate field '{}' in {kind} catalog",
                        decl.key
                    )));
                }
            }
            if !seen.contains("name") {
                return Err(CatalogError::invalid(format!(
                    "{kind} catalog must declare a 'name' field"
                )));
            }
        }
        Ok(())
    }

    /// Fields declared for records of the given kind.
    pub fn fields(&self, kind: FileKind) -> &[FieldDecl] {
        match kind {
            FileKind::Game => &self.game,
            FileKind::Folder => &self.folder,
        }
    }

    /// Look up a field of the given kind by key.
    pub fn field(&self, kind: FileKind, key: &str) -> Option<&FieldDecl> {
        self.fields(kind).iter().find(|d| d.key == key)
    }

    /// Ordered union of both lists by key: game fields first, then any
    /// folder-only fields. The first declaration of a key wins.
    pub fn columns(&self) -> Vec<&FieldDecl> {
        let mut seen = HashSet::new();
        self.game
            .iter()
            .chain(self.folder.iter())
            .filter(|d| seen.insert(d.key.as_str()))
            .collect()
    }
}

/// Normalize a date or datetime value to [`DATE_FORMAT`].
///
/// Accepts `YYYYMMDDTHHMMSS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD` and
/// `YYYYMMDD`. Anything else is returned unchanged.
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();

    if let Some(dt) = parse_datetime(trimmed) {
        return dt.format(DATE_FORMAT).to_string();
    }
    if let Some(date) = parse_date(trimmed) {
        return format!("{}T000000", date.format("%Y%m%d"));
    }
    value.to_string()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    // Compact form: expand to ISO so the parser sees fixed-width fields
    let b = s.as_bytes();
    if b.len() == 15
        && b[8] == b'T'
        && b[..8].iter().all(u8::is_ascii_digit)
        && b[9..].iter().all(u8::is_ascii_digit)
    {
        let iso = format!(
            "{}-{}-{}T{}:{}:{}",
            &s[0..4],
            &s[4..6],
            &s[6..8],
            &s[9..11],
            &s[11..13],
            &s[13..15]
        );
        return NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S").ok();
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() == 8 && s.bytes().all(|c| c.is_ascii_digit()) {
        let iso = format!("{}-{}-{}", &s[0..4], &s[4..6], &s[6..8]);
        return NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok();
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
