// crates/datatable-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Per-operation record store handle over one SQLite file.
// Purpose: Provide schema-ensure, open, keyed get, predicate scan, count,
//          and upsert over a physical database file.
// Dependencies: datatable-core, rusqlite, serde_json, tempfile, thiserror
// ============================================================================

//! ## Overview
//! A [`SqliteRecordStore`] owns exactly one open physical database file at a
//! time. Handles are constructed per operation: register table schemas,
//! open, query, release. Each logical table maps to one `SQLite` table with
//! a `pk TEXT PRIMARY KEY` column (the canonical primary-key string) and a
//! `payload TEXT` column holding the row's JSON. Keyed lookups hit the
//! primary-key index; predicate scans parse payloads and evaluate the
//! condition set in process.
//!
//! Table and field names are validated before being interpolated into SQL;
//! only `[A-Za-z_][A-Za-z0-9_]*` identifiers are accepted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use datatable_core::ConditionSet;
use datatable_core::FieldName;
use datatable_core::RecordStore;
use datatable_core::RowKey;
use datatable_core::StoreError;
use datatable_core::TableName;
use datatable_core::evaluate_conditions;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout applied to every connection (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Maximum accepted identifier length for table and field names.
const MAX_IDENTIFIER_LENGTH: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` record store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw row payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Filesystem-level failure.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine failure.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored payload failed JSON decoding.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Request violated the store contract.
    #[error("sqlite store invalid request: {0}")]
    Invalid(String),
    /// Operation against a handle that is not open.
    #[error("sqlite store closed: {0}")]
    Closed(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Db(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Closed(message) => Self::Closed(message),
        }
    }
}

// ============================================================================
// SECTION: Open Mode
// ============================================================================

/// How a path-backed handle opens its physical file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing file for reading only.
    ReadOnly,
    /// Open an existing file for reading and writing; missing files fail.
    ReadWrite,
    /// Open for reading and writing, creating the file when missing.
    ///
    /// Reserved for the address-map file on writable layouts.
    CreateIfMissing,
}

impl OpenMode {
    /// Returns the `SQLite` open flags for this mode.
    fn flags(self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI;
        match self {
            Self::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
            Self::ReadWrite => base | OpenFlags::SQLITE_OPEN_READ_WRITE,
            Self::CreateIfMissing => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        }
    }

    /// Returns `true` when the mode permits writes.
    const fn writable(self) -> bool {
        matches!(self, Self::ReadWrite | Self::CreateIfMissing)
    }
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Where the physical database bytes come from.
enum StoreSource {
    /// A database file on disk.
    Path {
        /// Location of the file.
        path: PathBuf,
        /// Open mode for the file.
        mode: OpenMode,
    },
    /// Raw database bytes from a bundled resource.
    Bytes(Vec<u8>),
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Per-operation record store over one physical `SQLite` file.
///
/// # Invariants
/// - Schemas registered via `ensure_table` are applied once, at `open`.
/// - Release is idempotent and also runs on drop.
pub struct SqliteRecordStore {
    /// Physical source of the database bytes.
    source: StoreSource,
    /// Busy timeout applied at open (ms).
    busy_timeout_ms: u64,
    /// Schemas registered before open: (table, primary field).
    registered: Vec<(TableName, FieldName)>,
    /// Open connection, present only between `open` and release.
    connection: Option<Connection>,
    /// Scratch file backing a bytes source while the connection is open.
    scratch: Option<NamedTempFile>,
}

impl SqliteRecordStore {
    /// Creates a handle over a database file on disk.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>, mode: OpenMode, busy_timeout_ms: u64) -> Self {
        Self {
            source: StoreSource::Path {
                path: path.as_ref().to_path_buf(),
                mode,
            },
            busy_timeout_ms,
            registered: Vec::new(),
            connection: None,
            scratch: None,
        }
    }

    /// Creates a read-only handle over raw database bytes.
    ///
    /// The bytes are materialized into a private scratch file at open and
    /// removed at release.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>, busy_timeout_ms: u64) -> Self {
        Self {
            source: StoreSource::Bytes(bytes),
            busy_timeout_ms,
            registered: Vec::new(),
            connection: None,
            scratch: None,
        }
    }

    /// Returns the open connection or a closed-handle error.
    fn conn(&self) -> Result<&Connection, SqliteStoreError> {
        self.connection
            .as_ref()
            .ok_or_else(|| SqliteStoreError::Closed("record store not open".to_string()))
    }

    /// Returns `true` when the handle permits writes.
    const fn writable(&self) -> bool {
        match &self.source {
            StoreSource::Path { mode, .. } => mode.writable(),
            StoreSource::Bytes(_) => false,
        }
    }

    /// Registers a table schema prior to open.
    fn register_table(
        &mut self,
        table: &TableName,
        primary_field: &FieldName,
    ) -> Result<(), SqliteStoreError> {
        if self.connection.is_some() {
            return Err(SqliteStoreError::Invalid(
                "ensure_table after open is not supported".to_string(),
            ));
        }
        validate_identifier("table name", table.as_str())?;
        validate_identifier("primary field", primary_field.as_str())?;
        if let Some((_, registered_field)) =
            self.registered.iter().find(|(registered, _)| registered == table)
        {
            if registered_field == primary_field {
                return Ok(());
            }
            return Err(SqliteStoreError::Invalid(format!(
                "table {table} re-registered with a different primary field"
            )));
        }
        self.registered.push((table.clone(), primary_field.clone()));
        Ok(())
    }

    /// Opens the connection and applies the registered schemas.
    fn open_connection(&mut self) -> Result<(), SqliteStoreError> {
        if self.connection.is_some() {
            return Ok(());
        }
        let connection = match &self.source {
            StoreSource::Path { path, mode } => {
                if !matches!(mode, OpenMode::CreateIfMissing) && !path.exists() {
                    return Err(SqliteStoreError::Io(format!(
                        "database file not found: {}",
                        path.display()
                    )));
                }
                Connection::open_with_flags(path, mode.flags())
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?
            }
            StoreSource::Bytes(bytes) => {
                let mut scratch = NamedTempFile::new()
                    .map_err(|err| SqliteStoreError::Io(err.to_string()))?;
                scratch
                    .write_all(bytes)
                    .and_then(|()| scratch.flush())
                    .map_err(|err| SqliteStoreError::Io(err.to_string()))?;
                let connection =
                    Connection::open_with_flags(scratch.path(), OpenMode::ReadOnly.flags())
                        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                self.scratch = Some(scratch);
                connection
            }
        };
        connection
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let writable = self.writable();
        if writable {
            // Single-writer files; rollback journaling keeps one file per db.
            connection
                .pragma_update(None, "journal_mode", "DELETE")
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        for (table, _) in &self.registered {
            if writable {
                let sql = format!(
                    "CREATE TABLE IF NOT EXISTS \"{table}\" (pk TEXT PRIMARY KEY, payload TEXT \
                     NOT NULL)"
                );
                connection
                    .execute(&sql, [])
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            } else {
                ensure_table_exists(&connection, table)?;
            }
        }
        self.connection = Some(connection);
        Ok(())
    }

    /// Returns the row payload keyed by the canonical key string.
    fn select_payload(
        &self,
        table: &TableName,
        key: &RowKey,
    ) -> Result<Option<Value>, SqliteStoreError> {
        validate_identifier("table name", table.as_str())?;
        let connection = self.conn()?;
        let sql = format!("SELECT payload FROM \"{table}\" WHERE pk = ?1");
        let payload = connection
            .query_row(&sql, params![key.canonical()], |row| row.get::<_, String>(0))
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        payload.map(|raw| parse_payload(table, &raw)).transpose()
    }

    /// Returns every row payload in storage order.
    fn select_payloads(&self, table: &TableName) -> Result<Vec<Value>, SqliteStoreError> {
        validate_identifier("table name", table.as_str())?;
        let connection = self.conn()?;
        let sql = format!("SELECT payload FROM \"{table}\" ORDER BY rowid");
        let mut statement =
            connection.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut payloads = Vec::new();
        for raw in rows {
            let raw = raw.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            payloads.push(parse_payload(table, &raw)?);
        }
        Ok(payloads)
    }

    /// Counts rows, filtering through the condition set when present.
    fn count_rows(
        &self,
        table: &TableName,
        set: Option<&ConditionSet>,
    ) -> Result<u64, SqliteStoreError> {
        validate_identifier("table name", table.as_str())?;
        let connection = self.conn()?;
        let Some(set) = set.filter(|set| !set.is_empty()) else {
            let sql = format!("SELECT COUNT(*) FROM \"{table}\"");
            let count = connection
                .query_row(&sql, [], |row| row.get::<_, i64>(0))
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            return u64::try_from(count)
                .map_err(|_| SqliteStoreError::Corrupt("negative row count".to_string()));
        };
        let sql = format!("SELECT payload FROM \"{table}\" ORDER BY rowid");
        let mut statement =
            connection.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut count: u64 = 0;
        for raw in rows {
            let raw = raw.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let payload = parse_payload(table, &raw)?;
            if evaluate_conditions(&payload, set) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Inserts or replaces one row.
    fn insert_payload(
        &mut self,
        table: &TableName,
        key: &RowKey,
        row: &Value,
    ) -> Result<(), SqliteStoreError> {
        validate_identifier("table name", table.as_str())?;
        if !self.writable() {
            return Err(SqliteStoreError::Invalid(
                "insert against a read-only store".to_string(),
            ));
        }
        let payload = serde_json::to_string(row)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let connection = self.conn()?;
        let sql = format!("INSERT OR REPLACE INTO \"{table}\" (pk, payload) VALUES (?1, ?2)");
        connection
            .execute(&sql, params![key.canonical(), payload])
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }

    /// Releases the connection and any scratch file. Idempotent.
    fn release(&mut self) {
        self.connection = None;
        self.scratch = None;
    }
}

impl Drop for SqliteRecordStore {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// SECTION: RecordStore Implementation
// ============================================================================

impl RecordStore for SqliteRecordStore {
    fn ensure_table(
        &mut self,
        table: &TableName,
        primary_field: &FieldName,
    ) -> Result<(), StoreError> {
        self.register_table(table, primary_field).map_err(StoreError::from)
    }

    fn open(&mut self) -> Result<(), StoreError> {
        self.open_connection().map_err(StoreError::from)
    }

    fn select(&self, table: &TableName, key: &RowKey) -> Result<Option<Value>, StoreError> {
        self.select_payload(table, key).map_err(StoreError::from)
    }

    fn select_where(
        &self,
        table: &TableName,
        set: &ConditionSet,
    ) -> Result<Vec<Value>, StoreError> {
        let payloads = self.select_payloads(table).map_err(StoreError::from)?;
        Ok(payloads.into_iter().filter(|payload| evaluate_conditions(payload, set)).collect())
    }

    fn select_all(&self, table: &TableName) -> Result<Vec<Value>, StoreError> {
        self.select_payloads(table).map_err(StoreError::from)
    }

    fn count(&self, table: &TableName, set: Option<&ConditionSet>) -> Result<u64, StoreError> {
        self.count_rows(table, set).map_err(StoreError::from)
    }

    fn insert(&mut self, table: &TableName, key: &RowKey, row: &Value) -> Result<(), StoreError> {
        self.insert_payload(table, key, row).map_err(StoreError::from)
    }

    fn close(&mut self) {
        self.release();
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates an identifier before SQL interpolation.
fn validate_identifier(label: &str, name: &str) -> Result<(), SqliteStoreError> {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(SqliteStoreError::Invalid(format!("{label} has invalid length: {name:?}")));
    }
    let mut chars = name.chars();
    let leading_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !leading_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteStoreError::Invalid(format!(
            "{label} contains unsupported characters: {name:?}"
        )));
    }
    Ok(())
}

/// Verifies a table exists on a read-only connection.
fn ensure_table_exists(
    connection: &Connection,
    table: &TableName,
) -> Result<(), SqliteStoreError> {
    let present: Option<String> = connection
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    if present.is_none() {
        return Err(SqliteStoreError::Invalid(format!(
            "table {table} missing from read-only database"
        )));
    }
    Ok(())
}

/// Parses one stored payload into a JSON value.
fn parse_payload(table: &TableName, raw: &str) -> Result<Value, SqliteStoreError> {
    serde_json::from_str(raw)
        .map_err(|err| SqliteStoreError::Corrupt(format!("bad payload in table {table}: {err}")))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
