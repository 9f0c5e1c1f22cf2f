// crates/datatable-core/src/interfaces/mod.rs
// ============================================================================
// Module: Data Table Interfaces
// Description: Backend-agnostic interfaces for record storage.
// Purpose: Define the contract surfaces implemented by storage backends.
// Dependencies: serde_json, thiserror, crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how the data table runtime reaches its embedded record
//! store without embedding backend-specific details. Rows cross this
//! boundary as JSON values; the typed boundary is [`crate::DataTableRow`].
//! Implementations must treat stored payloads as untrusted and fail closed
//! on corrupt data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::FieldName;
use crate::core::identifiers::LocalAddress;
use crate::core::identifiers::TableName;
use crate::core::query::ConditionSet;
use crate::core::row::RowKey;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Record store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Error messages avoid embedding raw row payloads.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Store I/O error.
    #[error("record store io error: {0}")]
    Io(String),
    /// Embedded engine error.
    #[error("record store db error: {0}")]
    Db(String),
    /// Stored payload is corrupt or fails decoding.
    #[error("record store corruption: {0}")]
    Corrupt(String),
    /// Invalid request against the store contract.
    #[error("record store invalid request: {0}")]
    Invalid(String),
    /// Operation against a closed or never-opened handle.
    #[error("record store closed: {0}")]
    Closed(String),
}

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Per-operation handle bound to one physical storage file.
///
/// Lifecycle: register schemas with [`RecordStore::ensure_table`], then
/// [`RecordStore::open`], then query, then release. Release is idempotent
/// and also happens on drop, so every exit path frees the file handle.
pub trait RecordStore {
    /// Idempotently registers the schema for `table`.
    ///
    /// Must be called before [`RecordStore::open`]; registrations after open
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the names are invalid or the handle is
    /// already open.
    fn ensure_table(
        &mut self,
        table: &TableName,
        primary_field: &FieldName,
    ) -> Result<(), StoreError>;

    /// Opens the underlying physical file and applies registered schemas.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file is missing or corrupt, unless
    /// the handle was constructed in create mode.
    fn open(&mut self) -> Result<(), StoreError>;

    /// Returns the row with the given primary key, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failures; absence is not an error.
    fn select(&self, table: &TableName, key: &RowKey) -> Result<Option<Value>, StoreError>;

    /// Returns all rows satisfying the condition set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failures.
    fn select_where(&self, table: &TableName, set: &ConditionSet)
    -> Result<Vec<Value>, StoreError>;

    /// Returns every row in the table, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failures.
    fn select_all(&self, table: &TableName) -> Result<Vec<Value>, StoreError>;

    /// Returns the cardinality of the table, optionally filtered, without
    /// materializing typed rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failures.
    fn count(&self, table: &TableName, set: Option<&ConditionSet>) -> Result<u64, StoreError>;

    /// Inserts or replaces a row keyed by `key`.
    ///
    /// Used by data-preparation tooling and tests; runtime queries are
    /// read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failures or read-only handles.
    fn insert(&mut self, table: &TableName, key: &RowKey, row: &Value) -> Result<(), StoreError>;

    /// Releases the open file handle. Safe to call multiple times.
    fn close(&mut self);
}

// ============================================================================
// SECTION: Store Resolver
// ============================================================================

/// Factory binding fresh record store handles to physical files.
pub trait StoreResolver {
    /// Binds a fresh handle to the physical file named by `address`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for unassigned addresses and
    /// [`StoreError`] for resolution failures. Callers screen unassigned
    /// addresses before resolving.
    fn resolve(&self, address: LocalAddress) -> Result<Box<dyn RecordStore>, StoreError>;

    /// Binds a fresh handle to the reserved address-map file.
    ///
    /// This is the only resolution allowed to create a missing file, and
    /// only on writable layouts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the address-map file cannot be bound.
    fn resolve_address_map(&self) -> Result<Box<dyn RecordStore>, StoreError>;
}
