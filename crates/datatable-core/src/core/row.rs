// crates/datatable-core/src/core/row.rs
// ============================================================================
// Module: Data Table Row Contract
// Description: Trait implemented by typed configuration rows.
// Purpose: Bind a row type to its logical table and primary-key field.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A data table row is an immutable configuration record: it is created by
//! deserialization from storage and never mutated in place by the manager.
//! Each row type names its logical table and designates one field as the
//! primary key. Rows travel through storage as JSON payloads; the typed
//! boundary is this trait.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

// ============================================================================
// SECTION: Row Key
// ============================================================================

/// Primary-key value of a row.
///
/// # Invariants
/// - The canonical string form is stable and collision-free across the two
///   variants: integers render as decimal digits, text renders verbatim.
///   Config tables key on either small integers or short names, never both
///   within one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Integer primary key.
    Integer(i64),
    /// Text primary key.
    Text(String),
}

impl RowKey {
    /// Returns the canonical storage form of the key.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RowKey {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// SECTION: Row Trait
// ============================================================================

/// Typed configuration row bound to one logical table.
pub trait DataTableRow: Serialize + DeserializeOwned {
    /// Logical table name for this row type.
    const TABLE: &'static str;

    /// Name of the primary-key field within the row.
    const PRIMARY_FIELD: &'static str;

    /// Returns the primary-key value of this row.
    fn primary_key(&self) -> RowKey;
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde::Serialize;

    use super::DataTableRow;
    use super::RowKey;

    #[derive(Debug, Serialize, Deserialize)]
    struct Item {
        id: i64,
        name: String,
    }

    impl DataTableRow for Item {
        const TABLE: &'static str = "Item";
        const PRIMARY_FIELD: &'static str = "id";

        fn primary_key(&self) -> RowKey {
            RowKey::Integer(self.id)
        }
    }

    #[test]
    fn canonical_key_forms_are_stable() {
        assert_eq!(RowKey::Integer(42).canonical(), "42");
        assert_eq!(RowKey::Integer(-7).canonical(), "-7");
        assert_eq!(RowKey::Text("sword".to_string()).canonical(), "sword");
    }

    #[test]
    fn row_type_exposes_table_and_primary_field() {
        let item = Item {
            id: 3,
            name: "Shield".to_string(),
        };
        assert_eq!(Item::TABLE, "Item");
        assert_eq!(Item::PRIMARY_FIELD, "id");
        assert_eq!(item.primary_key(), RowKey::Integer(3));
        assert_eq!(item.name, "Shield");
    }
}
