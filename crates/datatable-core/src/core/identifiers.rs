// crates/datatable-core/src/core/identifiers.rs
// ============================================================================
// Module: Data Table Identifiers
// Description: Canonical opaque identifiers for tables, fields, and files.
// Purpose: Provide strongly typed, serializable identifiers with stable wire
//          forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout the data
//! table layer. Table and field names are opaque strings; local addresses
//! are integers naming a physical storage file. Addresses `<= 1` are
//! reserved and never refer to a data file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Logical table name, keyed by row-type identity.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this
///   type. Backends validate names before use in storage statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Creates a new table name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TableName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TableName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Name of a field within a row.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this
///   type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Creates a new field name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Integer identifier of a physical storage file.
///
/// # Invariants
/// - Values `<= 1` are reserved: `1` names the address-map file itself and
///   anything lower is "not yet assigned". Data files start at `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalAddress(i64);

impl LocalAddress {
    /// Creates a local address from a raw value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw address value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` when the address names an actual data file (`>= 2`).
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 >= 2
    }
}

impl fmt::Display for LocalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::LocalAddress;
    use super::TableName;

    #[test]
    fn reserved_addresses_are_unassigned() {
        assert!(!LocalAddress::new(-3).is_assigned());
        assert!(!LocalAddress::new(0).is_assigned());
        assert!(!LocalAddress::new(1).is_assigned());
        assert!(LocalAddress::new(2).is_assigned());
        assert!(LocalAddress::new(40).is_assigned());
    }

    #[test]
    fn table_name_round_trips_as_transparent_string() {
        let name = TableName::new("Item");
        assert_eq!(name.as_str(), "Item");
        assert_eq!(name.to_string(), "Item");
    }
}
