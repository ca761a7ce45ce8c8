//! The record store: one SQLite table keyed by (file id, collection id).

use std::path::Path;

use gamelist_core::{FieldCatalog, FileKind, MetadataMap, Record};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use thiserror::Error;

use crate::schema::{self, FIXED_COLUMNS, SchemaError, TABLE, TableSchema, quote_identifier};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not open database {path}: {source}")]
    Open {
        path: String,
        source: rusqlite::Error,
    },
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("No record for '{file_id}' in collection '{collection_id}'")]
    NotFound {
        file_id: String,
        collection_id: String,
    },
    #[error("Write failed: {0}")]
    Write(rusqlite::Error),
    #[error("Unknown field '{0}': not a column of the files table")]
    UnknownField(String),
    #[error("Transaction failed: {0}")]
    Transaction(rusqlite::Error),
    #[error("SQLite error: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("Invalid row for '{file_id}': {reason}")]
    InvalidRow { file_id: String, reason: String },
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

const KIND_GAME: i64 = 0;
const KIND_FOLDER: i64 = 1;

fn kind_to_sql(kind: FileKind) -> i64 {
    match kind {
        FileKind::Game => KIND_GAME,
        FileKind::Folder => KIND_FOLDER,
    }
}

fn kind_from_sql(value: i64) -> Option<FileKind> {
    match value {
        KIND_GAME => Some(FileKind::Game),
        KIND_FOLDER => Some(FileKind::Folder),
        _ => None,
    }
}

/// Handle to an open gamelist database.
///
/// The handle owns its connection; dropping it closes the database. Use
/// [`GamelistDb::close`] to observe close errors.
#[derive(Debug)]
pub struct GamelistDb {
    conn: Connection,
    catalog: FieldCatalog,
    schema: TableSchema,
    /// Non-fixed columns actually present in the table, in storage order.
    /// Superset of the schema's columns when the table predates a catalog
    /// change.
    columns: Vec<String>,
    put_sql: String,
    insert_ignore_sql: String,
}

impl GamelistDb {
    /// Open or create a database at `path` with the built-in catalog.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_catalog(path, FieldCatalog::builtin())
    }

    /// Open or create a database at `path`, shaping the table after `catalog`.
    pub fn open_with_catalog(path: &Path, catalog: FieldCatalog) -> Result<Self, StoreError> {
        // Validate before creating anything on disk
        let schema = TableSchema::from_catalog(&catalog)?;

        let open_err = |source| StoreError::Open {
            path: path.display().to_string(),
            source,
        };
        let conn = Connection::open(path).map_err(open_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(open_err)?;

        Self::init(conn, catalog, schema)
    }

    /// Open an in-memory database. Useful for testing.
    pub fn open_memory(catalog: FieldCatalog) -> Result<Self, StoreError> {
        let schema = TableSchema::from_catalog(&catalog)?;
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Self::init(conn, catalog, schema)
    }

    fn init(conn: Connection, catalog: FieldCatalog, schema: TableSchema) -> Result<Self, StoreError> {
        let added = schema::ensure_schema(&conn, &schema)?;
        if !added.is_empty() {
            log::info!("Added columns to {TABLE}: {}", added.join(", "));
        }

        let columns: Vec<String> = schema::table_columns(&conn)
            .map_err(SchemaError::from)?
            .into_iter()
            .filter(|c| !is_fixed(c))
            .collect();

        let put_sql = insert_sql("INSERT OR REPLACE", &columns);
        let insert_ignore_sql = insert_sql("INSERT OR IGNORE", &columns);

        Ok(Self {
            conn,
            catalog,
            schema,
            columns,
            put_sql,
            insert_ignore_sql,
        })
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Metadata columns present in the table, in storage order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Underlying connection, for ad-hoc queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Start a transaction. Writes made through this handle while the
    /// transaction is alive become visible together on
    /// [`StoreTransaction::commit`]; dropping it without committing rolls
    /// everything back.
    pub fn transaction(&self) -> Result<StoreTransaction<'_>, StoreError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(StoreError::Transaction)?;
        Ok(StoreTransaction { tx })
    }

    /// Look up one record by key.
    pub fn get_record(&self, file_id: &str, collection_id: &str) -> Result<Record, StoreError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT * FROM {TABLE} WHERE fileid = ?1 AND systemid = ?2"
        ))?;
        let names = column_names(&stmt);
        let record = stmt
            .query_row(params![file_id, collection_id], |row| Ok(row_to_record(row, &names)))
            .optional()?;

        match record {
            Some(record) => record,
            None => Err(StoreError::NotFound {
                file_id: file_id.to_string(),
                collection_id: collection_id.to_string(),
            }),
        }
    }

    /// Insert a record, replacing any existing row with the same key.
    ///
    /// Every metadata column is written: fields absent from `metadata` are
    /// stored as NULL. The existence flag is set. Keys must match a column
    /// name exactly, case included.
    pub fn put_record(
        &self,
        file_id: &str,
        collection_id: &str,
        metadata: &MetadataMap,
    ) -> Result<(), StoreError> {
        for (key, _) in metadata.iter() {
            if !self.columns.iter().any(|c| c == key) {
                return Err(StoreError::UnknownField(key.to_string()));
            }
        }

        let values = self.row_values(file_id, collection_id, metadata);
        let mut stmt = self.conn.prepare_cached(&self.put_sql)?;
        stmt.execute(params_from_iter(values))
            .map_err(StoreError::Write)?;
        log::debug!("put {} {file_id} ({collection_id})", metadata.kind());
        Ok(())
    }

    /// Insert a bare row unless one with this key already exists.
    ///
    /// The new row holds the catalog defaults for `kind` and NULL for every
    /// other field. Returns `true` if a row was inserted. Existing rows are
    /// never touched, whatever their kind.
    pub fn insert_ignore(
        &self,
        file_id: &str,
        collection_id: &str,
        kind: FileKind,
    ) -> Result<bool, StoreError> {
        let defaults = MetadataMap::with_defaults(kind, &self.catalog);
        let values = self.row_values(file_id, collection_id, &defaults);

        let mut stmt = self.conn.prepare_cached(&self.insert_ignore_sql)?;
        let changed = stmt
            .execute(params_from_iter(values))
            .map_err(StoreError::Write)?;
        if changed > 0 {
            log::debug!("added {kind} {file_id} ({collection_id})");
        }
        Ok(changed > 0)
    }

    /// Bind values for an insert: key, kind, then one value per column.
    fn row_values(&self, file_id: &str, collection_id: &str, metadata: &MetadataMap) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.columns.len() + 3);
        values.push(Value::Text(file_id.to_string()));
        values.push(Value::Text(collection_id.to_string()));
        values.push(Value::Integer(kind_to_sql(metadata.kind())));
        for column in &self.columns {
            values.push(match metadata.get(column) {
                Some(v) => Value::Text(v.to_string()),
                None => Value::Null,
            });
        }
        values
    }

    /// Update the existence flag of one record. Returns `false` if no such
    /// record exists.
    pub fn set_exists(
        &self,
        file_id: &str,
        collection_id: &str,
        exists: bool,
    ) -> Result<bool, StoreError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "UPDATE {TABLE} SET fileexists = ?1 WHERE fileid = ?2 AND systemid = ?3"
        ))?;
        let changed = stmt
            .execute(params![exists, file_id, collection_id])
            .map_err(StoreError::Write)?;
        Ok(changed > 0)
    }

    /// Visit every record of a collection in storage order.
    ///
    /// Rows are read one at a time. Returns the number of records visited.
    pub fn for_each_record<F>(&self, collection_id: &str, mut visit: F) -> Result<usize, StoreError>
    where
        F: FnMut(Record),
    {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT * FROM {TABLE} WHERE systemid = ?1"))?;
        let names = column_names(&stmt);
        let mut rows = stmt.query(params![collection_id])?;

        let mut count = 0;
        while let Some(row) = rows.next()? {
            visit(row_to_record(row, &names)?);
            count += 1;
        }
        Ok(count)
    }

    /// File ids of every record in a collection, in storage order.
    pub fn file_ids(&self, collection_id: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT fileid FROM {TABLE} WHERE systemid = ?1"))?;
        let ids = stmt
            .query_map(params![collection_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Number of records in a collection.
    pub fn count(&self, collection_id: &str) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {TABLE} WHERE systemid = ?1"),
            params![collection_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Number of records in a collection whose existence flag is cleared.
    pub fn count_missing(&self, collection_id: &str) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {TABLE} WHERE systemid = ?1 AND fileexists = 0"),
            params![collection_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Distinct collection ids with at least one record, sorted.
    pub fn collection_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT systemid FROM {TABLE} ORDER BY systemid"
        ))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Close the database, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Query(e))
    }
}

/// An open transaction on a [`GamelistDb`].
pub struct StoreTransaction<'a> {
    tx: rusqlite::Transaction<'a>,
}

impl StoreTransaction<'_> {
    pub fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().map_err(StoreError::Transaction)
    }

    /// Discard every write made since the transaction began.
    pub fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().map_err(StoreError::Transaction)
    }
}

/// `<verb> INTO files (...) VALUES (...)` over the fixed columns and
/// `columns`; the existence flag is always written as set.
fn insert_sql(verb: &str, columns: &[String]) -> String {
    let mut sql = format!("{verb} INTO {TABLE} (fileid, systemid, filetype, fileexists");
    for column in columns {
        sql.push_str(", ");
        sql.push_str(&quote_identifier(column));
    }
    sql.push_str(") VALUES (?1, ?2, ?3, 1");
    for i in 0..columns.len() {
        sql.push_str(&format!(", ?{}", i + 4));
    }
    sql.push(')');
    sql
}

fn is_fixed(column: &str) -> bool {
    FIXED_COLUMNS.iter().any(|f| f.eq_ignore_ascii_case(column))
}

fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

/// Render a stored value as text. NULL has no text form.
///
/// REAL values use the shortest form that parses back to the same number,
/// so `1.0` reads as `"1"` and `0.80` as `"0.8"`. Catalog defaults such as
/// rating `"0"` are written in this form and read back unchanged.
fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

fn row_to_record(row: &Row<'_>, names: &[String]) -> Result<Record, StoreError> {
    let mut file_id = String::new();
    let mut collection_id = String::new();
    let mut kind_raw = None;
    let mut exists = true;
    let mut fields = Vec::new();

    for (i, name) in names.iter().enumerate() {
        match name.to_ascii_lowercase().as_str() {
            "fileid" => file_id = row.get(i)?,
            "systemid" => collection_id = row.get(i)?,
            "filetype" => kind_raw = Some(row.get::<_, i64>(i)?),
            // NULL only appears on rows written by other tools
            "fileexists" => exists = row.get::<_, Option<bool>>(i)?.unwrap_or(true),
            _ => {
                if let Some(value) = value_to_string(row.get_ref(i)?) {
                    fields.push((name.clone(), value));
                }
            }
        }
    }

    let kind = kind_raw.and_then(kind_from_sql).ok_or_else(|| StoreError::InvalidRow {
        file_id: file_id.clone(),
        reason: format!("unknown filetype {kind_raw:?}"),
    })?;

    let mut metadata = MetadataMap::new(kind);
    for (key, value) in fields {
        metadata.set(key, value);
    }

    Ok(Record {
        file_id,
        collection_id,
        exists,
        metadata,
    })
}
