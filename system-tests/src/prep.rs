// system-tests/src/prep.rs
// ============================================================================
// Module: Data Preparation Helpers
// Description: Offline-style preparation of address-map and data files.
// Purpose: Build physical db files for system-test scenarios.
// Dependencies: datatable-core, datatable-store-sqlite, serde, serde_json
// ============================================================================

//! ## Overview
//! These helpers play the role of the offline data-preparation tooling: they
//! create the `db1` address-map file and numbered data files under a root
//! directory using the same naming convention the runtime resolver reads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use datatable_core::DataTableRow;
use datatable_core::FieldName;
use datatable_core::LocalAddress;
use datatable_core::RecordStore;
use datatable_core::RowKey;
use datatable_core::StoreError;
use datatable_core::TableAddress;
use datatable_core::TableName;
use datatable_store_sqlite::OpenMode;
use datatable_store_sqlite::SqliteRecordStore;
use datatable_store_sqlite::db_file_name;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Sample Rows
// ============================================================================

/// Sample config row used across system-test scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Primary key.
    #[serde(rename = "Id")]
    pub id: i64,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Quality tier used by conditional queries.
    #[serde(rename = "Quality")]
    pub quality: i64,
}

impl DataTableRow for Item {
    const TABLE: &'static str = "Item";
    const PRIMARY_FIELD: &'static str = "Id";

    fn primary_key(&self) -> RowKey {
        RowKey::Integer(self.id)
    }
}

/// Row type that is deliberately never registered in the address map.
#[derive(Debug, Serialize, Deserialize)]
pub struct Npc {
    /// Primary key.
    #[serde(rename = "Id")]
    pub id: i64,
}

impl DataTableRow for Npc {
    const TABLE: &'static str = "Npc";
    const PRIMARY_FIELD: &'static str = "Id";

    fn primary_key(&self) -> RowKey {
        RowKey::Integer(self.id)
    }
}

// ============================================================================
// SECTION: File Preparation
// ============================================================================

/// Writes the `db1` address-map file under `root`.
///
/// # Errors
///
/// Returns [`StoreError`] when the file cannot be created or written.
pub fn write_address_map(root: &Path, entries: &[TableAddress]) -> Result<(), StoreError> {
    let path = root.join(db_file_name(datatable_core::RESERVED_ADDRESS_MAP_ADDRESS));
    let mut store = SqliteRecordStore::from_path(path, OpenMode::CreateIfMissing, 1_000);
    store.ensure_table(
        &TableName::new(datatable_core::ADDRESS_MAP_TABLE),
        &FieldName::new(datatable_core::ADDRESS_MAP_PRIMARY_FIELD),
    )?;
    store.open()?;
    for entry in entries {
        let payload =
            serde_json::to_value(entry).map_err(|err| StoreError::Invalid(err.to_string()))?;
        store.insert(
            &TableName::new(TableAddress::TABLE),
            &entry.primary_key(),
            &payload,
        )?;
    }
    store.close();
    Ok(())
}

/// Writes rows of `T` into the numbered data file for `address`.
///
/// # Errors
///
/// Returns [`StoreError`] when the file cannot be created or written.
pub fn write_rows<T: DataTableRow>(
    root: &Path,
    address: LocalAddress,
    rows: &[T],
) -> Result<(), StoreError> {
    let path = root.join(db_file_name(address));
    let mut store = SqliteRecordStore::from_path(path, OpenMode::CreateIfMissing, 1_000);
    let table = TableName::new(T::TABLE);
    store.ensure_table(&table, &FieldName::new(T::PRIMARY_FIELD))?;
    store.open()?;
    for row in rows {
        let payload =
            serde_json::to_value(row).map_err(|err| StoreError::Invalid(err.to_string()))?;
        store.insert(&table, &row.primary_key(), &payload)?;
    }
    store.close();
    Ok(())
}

/// Returns the standard two-item fixture from the scenario walkthrough.
#[must_use]
pub fn sample_items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            name: "Sword".to_string(),
            quality: 2,
        },
        Item {
            id: 2,
            name: "Shield".to_string(),
            quality: 4,
        },
    ]
}
