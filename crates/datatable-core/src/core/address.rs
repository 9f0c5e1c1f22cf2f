// crates/datatable-core/src/core/address.rs
// ============================================================================
// Module: Data Table Address Map
// Description: Indirection records routing row types to physical files.
// Purpose: Model the address-map table and its reserved storage location.
// Dependencies: serde, crate::core::identifiers
// ============================================================================

//! ## Overview
//! The address map is a single well-known table with one entry per row-type
//! name. Each entry names the primary-key field for that type and the
//! integer address of the physical file holding its table. Many row types
//! may share one file; the partition is by address, not by type. The map is
//! prepared offline and read-only at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::FieldName;
use crate::core::identifiers::LocalAddress;
use crate::core::identifiers::TableName;
use crate::core::row::DataTableRow;
use crate::core::row::RowKey;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the well-known address-map table.
pub const ADDRESS_MAP_TABLE: &str = "__address_map";

/// Primary-key field of the address-map table.
pub const ADDRESS_MAP_PRIMARY_FIELD: &str = "table";

/// Reserved address of the physical file holding the address map itself.
///
/// Data files start one past this address, which is why addresses `<= 1`
/// can never name a data table's file.
pub const RESERVED_ADDRESS_MAP_ADDRESS: LocalAddress = LocalAddress::new(1);

// ============================================================================
// SECTION: Address Record
// ============================================================================

/// One address-map entry: row-type name, primary-key field, file address.
///
/// # Invariants
/// - At most one entry exists per table name; `table` is the lookup key.
/// - `local_address` values `<= 1` mean "not yet assigned".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAddress {
    /// Logical table name this entry routes.
    pub table: TableName,
    /// Primary-key field name for the routed row type.
    pub primary_field: FieldName,
    /// Physical file address holding the routed table.
    pub local_address: LocalAddress,
}

impl TableAddress {
    /// Creates a new address-map entry.
    #[must_use]
    pub fn new(
        table: impl Into<TableName>,
        primary_field: impl Into<FieldName>,
        local_address: LocalAddress,
    ) -> Self {
        Self {
            table: table.into(),
            primary_field: primary_field.into(),
            local_address,
        }
    }
}

impl DataTableRow for TableAddress {
    const TABLE: &'static str = ADDRESS_MAP_TABLE;
    const PRIMARY_FIELD: &'static str = ADDRESS_MAP_PRIMARY_FIELD;

    fn primary_key(&self) -> RowKey {
        RowKey::Text(self.table.as_str().to_string())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
