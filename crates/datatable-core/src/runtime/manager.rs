// crates/datatable-core/src/runtime/manager.rs
// ============================================================================
// Module: Data Table Manager
// Description: Context object executing typed queries through record stores.
// Purpose: Resolve row types to physical files and drive the query protocol.
// Dependencies: serde_json, thiserror, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`DataTableContext`] is the façade callers query configuration rows
//! through. It owns the long-lived address-map store (opened lazily on first
//! use) and a [`StoreResolver`] that binds a fresh per-call store to the
//! physical file routing each row type. Every query follows one protocol:
//! resolve the address-map entry, bind a store, ensure the table schema,
//! open, run the query variant, release the store on every exit path.
//!
//! Absent or unassigned address-map entries yield the zero value for the
//! call (`None` / empty / `0`) without touching any data file. Storage
//! failures surface as [`TableError`] instead of being swallowed. The
//! context is single-threaded by construction: the `&mut self` surface makes
//! exclusive use explicit and no internal locking exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::address::ADDRESS_MAP_PRIMARY_FIELD;
use crate::core::address::ADDRESS_MAP_TABLE;
use crate::core::address::TableAddress;
use crate::core::identifiers::FieldName;
use crate::core::identifiers::TableName;
use crate::core::query::ConditionSet;
use crate::core::row::DataTableRow;
use crate::core::row::RowKey;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;
use crate::interfaces::StoreResolver;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Data table query errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Configuration absence is never an error; it yields zero values.
#[derive(Debug, Error)]
pub enum TableError {
    /// Underlying record store failure.
    #[error("data table store failure: {0}")]
    Store(#[from] StoreError),
    /// Stored payload did not decode into the requested row type.
    #[error("data table row decode failure: {0}")]
    Decode(String),
    /// The context was closed and can no longer serve queries.
    #[error("data table context is closed")]
    Closed,
}

// ============================================================================
// SECTION: Context State
// ============================================================================

/// Lifecycle of the long-lived address-map store.
enum AddressMapState {
    /// No query has run yet; the address-map store is not open.
    Uninitialized,
    /// The address-map store is open and serving lookups.
    Ready(Box<dyn RecordStore>),
    /// The context was closed; terminal.
    Closed,
}

/// Process-wide data table context.
///
/// # Invariants
/// - The address-map store is opened at most once and lives until
///   [`DataTableContext::close`].
/// - Every data-file store is bound, used, and released within a single
///   query call.
pub struct DataTableContext {
    /// Factory binding stores to physical files.
    resolver: Box<dyn StoreResolver>,
    /// Long-lived address-map store and lifecycle state.
    address_map: AddressMapState,
}

impl DataTableContext {
    /// Creates a context over the given resolver.
    ///
    /// The address-map store opens lazily on the first query.
    #[must_use]
    pub fn new(resolver: Box<dyn StoreResolver>) -> Self {
        Self {
            resolver,
            address_map: AddressMapState::Uninitialized,
        }
    }

    /// Returns `true` once the context was closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.address_map, AddressMapState::Closed)
    }

    /// Closes the context, releasing the address-map store. Idempotent;
    /// every subsequent query returns [`TableError::Closed`].
    pub fn close(&mut self) {
        if let AddressMapState::Ready(store) = &mut self.address_map {
            store.close();
        }
        self.address_map = AddressMapState::Closed;
    }

    // ------------------------------------------------------------------
    // Address map resolution
    // ------------------------------------------------------------------

    /// Returns the address-map entry routing `T`, or `None` when the type
    /// was never registered by data preparation.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] when the address-map store fails or the entry
    /// payload is malformed.
    pub fn address_of<T: DataTableRow>(&mut self) -> Result<Option<TableAddress>, TableError> {
        self.address_entry(&TableName::new(T::TABLE))
    }

    /// Looks up the address-map entry keyed by `table`.
    fn address_entry(&mut self, table: &TableName) -> Result<Option<TableAddress>, TableError> {
        let store = self.address_map_store()?;
        let map_table = TableName::new(ADDRESS_MAP_TABLE);
        let key = RowKey::Text(table.as_str().to_string());
        let Some(payload) = store.select(&map_table, &key)? else {
            return Ok(None);
        };
        decode_row(payload).map(Some)
    }

    /// Returns the address-map store, opening it on first use.
    fn address_map_store(&mut self) -> Result<&dyn RecordStore, TableError> {
        if self.is_closed() {
            return Err(TableError::Closed);
        }
        if matches!(self.address_map, AddressMapState::Uninitialized) {
            let mut store = self.resolver.resolve_address_map()?;
            store.ensure_table(
                &TableName::new(ADDRESS_MAP_TABLE),
                &FieldName::new(ADDRESS_MAP_PRIMARY_FIELD),
            )?;
            store.open()?;
            self.address_map = AddressMapState::Ready(store);
        }
        match &self.address_map {
            AddressMapState::Ready(store) => Ok(store.as_ref()),
            AddressMapState::Uninitialized | AddressMapState::Closed => Err(TableError::Closed),
        }
    }

    // ------------------------------------------------------------------
    // Query operations
    // ------------------------------------------------------------------

    /// Returns the row of `T` with the given primary key, or `None` when
    /// the key is absent or the type has no assigned storage.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on storage or decode failures.
    pub fn row<T: DataTableRow>(
        &mut self,
        key: impl Into<RowKey>,
    ) -> Result<Option<T>, TableError> {
        let key = key.into();
        let payload =
            self.run_query(&TableName::new(T::TABLE), None, |store, table| {
                store.select(table, &key)
            })?;
        payload.map(decode_row).transpose()
    }

    /// Returns all rows of `T` satisfying the condition set.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on storage or decode failures.
    pub fn rows<T: DataTableRow>(&mut self, set: &ConditionSet) -> Result<Vec<T>, TableError> {
        let payloads =
            self.run_query(&TableName::new(T::TABLE), Vec::new(), |store, table| {
                store.select_where(table, set)
            })?;
        payloads.into_iter().map(decode_row).collect()
    }

    /// Returns every row of `T`, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on storage or decode failures.
    pub fn all_rows<T: DataTableRow>(&mut self) -> Result<Vec<T>, TableError> {
        let payloads = self.run_query(&TableName::new(T::TABLE), Vec::new(), |store, table| {
            store.select_all(table)
        })?;
        payloads.into_iter().map(decode_row).collect()
    }

    /// Returns the number of rows of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on storage failures.
    pub fn count_all<T: DataTableRow>(&mut self) -> Result<u64, TableError> {
        self.run_query(&TableName::new(T::TABLE), 0, |store, table| {
            store.count(table, None)
        })
    }

    /// Returns the number of rows of `T` satisfying the condition set.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on storage failures.
    pub fn count<T: DataTableRow>(&mut self, set: &ConditionSet) -> Result<u64, TableError> {
        self.run_query(&TableName::new(T::TABLE), 0, |store, table| {
            store.count(table, Some(set))
        })
    }

    // ------------------------------------------------------------------
    // Query protocol
    // ------------------------------------------------------------------

    /// Runs one query through a freshly bound store, releasing the store on
    /// every exit path. Absent or unassigned routing yields `zero`.
    fn run_query<R>(
        &mut self,
        table: &TableName,
        zero: R,
        run: impl FnOnce(&dyn RecordStore, &TableName) -> Result<R, StoreError>,
    ) -> Result<R, TableError> {
        let Some(address) = self.address_entry(table)? else {
            return Ok(zero);
        };
        if !address.local_address.is_assigned() {
            return Ok(zero);
        }
        let mut store = self.resolver.resolve(address.local_address)?;
        let result = prepare_and_run(store.as_mut(), table, &address.primary_field, run);
        store.close();
        drop(store);
        result.map_err(TableError::from)
    }
}

/// Ensures the table schema, opens the store, and runs the query variant.
fn prepare_and_run<R>(
    store: &mut dyn RecordStore,
    table: &TableName,
    primary_field: &FieldName,
    run: impl FnOnce(&dyn RecordStore, &TableName) -> Result<R, StoreError>,
) -> Result<R, StoreError> {
    store.ensure_table(table, primary_field)?;
    store.open()?;
    run(&*store, table)
}

/// Decodes one stored payload into a typed row.
fn decode_row<T: DataTableRow>(payload: Value) -> Result<T, TableError> {
    serde_json::from_value(payload).map_err(|err| TableError::Decode(err.to_string()))
}
