// crates/datatable-core/src/lib.rs
// ============================================================================
// Module: Data Table Core
// Description: Core model, interfaces, and runtime for the data table layer.
// Purpose: Define rows, addressing, queries, and the manager context.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `datatable-core` is the backend-agnostic heart of the data table layer:
//! strongly typed identifiers, the [`DataTableRow`] trait for configuration
//! records, the address map that routes row types to physical storage files,
//! condition-based query descriptions, and the [`DataTableContext`] manager
//! that executes queries through a pluggable [`RecordStore`] backend.
//!
//! Storage backends live in sibling crates; this crate never touches the
//! filesystem itself.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::core::address::ADDRESS_MAP_PRIMARY_FIELD;
pub use crate::core::address::ADDRESS_MAP_TABLE;
pub use crate::core::address::RESERVED_ADDRESS_MAP_ADDRESS;
pub use crate::core::address::TableAddress;
pub use crate::core::identifiers::FieldName;
pub use crate::core::identifiers::LocalAddress;
pub use crate::core::identifiers::TableName;
pub use crate::core::query::BoolOp;
pub use crate::core::query::CompareOp;
pub use crate::core::query::ConditionSet;
pub use crate::core::query::QueryCondition;
pub use crate::core::row::DataTableRow;
pub use crate::core::row::RowKey;
pub use interfaces::RecordStore;
pub use interfaces::StoreError;
pub use interfaces::StoreResolver;
pub use runtime::evaluator::evaluate_conditions;
pub use runtime::manager::DataTableContext;
pub use runtime::manager::TableError;
