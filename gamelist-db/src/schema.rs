//! Catalog-driven schema for the `files` table.
//!
//! The table has four fixed columns (`fileid`, `systemid`, `filetype`,
//! `fileexists`) followed by one column per catalog field. The column set is
//! validated when the [`TableSchema`] is built, before any SQL runs.

use std::collections::{HashMap, HashSet};

use gamelist_core::{FieldCatalog, FieldType, FileKind};
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid column name '{0}': must be alphanumeric or '_' and not start with a digit")]
    InvalidColumn(String),
    #[error("Field '{0}' collides with a fixed column")]
    ReservedColumn(String),
    #[error("Field '{key}' is declared more than once in the {kind} catalog")]
    DuplicateColumn { key: String, kind: FileKind },
    #[error("Field '{key}' has type {game:?} for games but {folder:?} for folders")]
    ConflictingType {
        key: String,
        game: FieldType,
        folder: FieldType,
    },
}

/// Name of the single record table.
pub const TABLE: &str = "files";

/// Columns every row has regardless of catalog, in storage order.
pub const FIXED_COLUMNS: [&str; 4] = ["fileid", "systemid", "filetype", "fileexists"];

/// SQLite column type chosen for a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
    Date,
    DateTime,
}

impl ColumnType {
    pub fn for_field(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String | FieldType::MultilineString | FieldType::ImagePath => {
                ColumnType::Text
            }
            FieldType::Int => ColumnType::Integer,
            FieldType::Float | FieldType::Rating => ColumnType::Real,
            FieldType::Date => ColumnType::Date,
            FieldType::DateTime => ColumnType::DateTime,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "DATETIME",
        }
    }
}

/// A catalog-derived column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub default: Option<String>,
}

impl Column {
    /// Column definition as used in `CREATE TABLE` / `ADD COLUMN`.
    pub fn definition(&self) -> String {
        let mut def = format!("{} {}", quote_identifier(&self.name), self.column_type.sql());
        if let Some(ref default) = self.default {
            def.push_str(" DEFAULT ");
            def.push_str(&sql_literal(default));
        }
        def
    }
}

/// Validated column layout of the `files` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    /// Build the column layout from a catalog.
    ///
    /// Game fields come first, then folder-only fields. A key declared for
    /// both kinds must have the same type in both. SQLite identifiers are
    /// case-insensitive, so collisions are checked case-insensitively.
    pub fn from_catalog(catalog: &FieldCatalog) -> Result<Self, SchemaError> {
        let reserved: HashSet<&str> = FIXED_COLUMNS.into_iter().collect();
        // lowercase key -> (declared key, type, declaring kind)
        let mut seen: HashMap<String, (&str, FieldType, FileKind)> = HashMap::new();
        let mut columns = Vec::new();

        for kind in FileKind::ALL {
            for decl in catalog.fields(kind) {
                validate_identifier(&decl.key)?;
                let lower = decl.key.to_ascii_lowercase();
                if reserved.contains(lower.as_str()) {
                    return Err(SchemaError::ReservedColumn(decl.key.clone()));
                }

                match seen.get(&lower) {
                    Some(&(key, field_type, prev_kind)) => {
                        if prev_kind == kind || key != decl.key {
                            return Err(SchemaError::DuplicateColumn {
                                key: decl.key.clone(),
                                kind,
                            });
                        }
                        if field_type != decl.field_type {
                            return Err(SchemaError::ConflictingType {
                                key: decl.key.clone(),
                                game: field_type,
                                folder: decl.field_type,
                            });
                        }
                    }
                    None => {
                        seen.insert(lower, (&decl.key, decl.field_type, kind));
                        columns.push(Column {
                            name: decl.key.clone(),
                            column_type: ColumnType::for_field(decl.field_type),
                            default: decl.default.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this layout.
    pub fn create_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (\n    \
             fileid TEXT NOT NULL,\n    \
             systemid TEXT NOT NULL,\n    \
             filetype INTEGER NOT NULL,\n    \
             fileexists BOOLEAN,\n"
        );
        for column in &self.columns {
            sql.push_str("    ");
            sql.push_str(&column.definition());
            sql.push_str(",\n");
        }
        sql.push_str("    PRIMARY KEY (fileid, systemid)\n)");
        sql
    }
}

/// Create the table if needed and add any catalog columns an existing table
/// lacks. Returns the names of the added columns.
///
/// Columns the table has but the catalog no longer declares are left alone.
pub fn ensure_schema(conn: &Connection, schema: &TableSchema) -> Result<Vec<String>, SchemaError> {
    conn.execute_batch(&schema.create_sql())?;

    let existing: HashSet<String> = table_columns(conn)?
        .into_iter()
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut added = Vec::new();
    for column in schema.columns() {
        if existing.contains(&column.name.to_ascii_lowercase()) {
            continue;
        }
        conn.execute_batch(&format!(
            "ALTER TABLE {TABLE} ADD COLUMN {}",
            column.definition()
        ))?;
        added.push(column.name.clone());
    }
    Ok(added)
}

/// All column names of the `files` table in storage order.
pub fn table_columns(conn: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn validate_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidColumn(name.to_string()))
    }
}

/// Quote a column name so keywords such as `order` are usable as keys.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
