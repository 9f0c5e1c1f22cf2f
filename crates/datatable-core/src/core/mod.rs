// crates/datatable-core/src/core/mod.rs
// ============================================================================
// Module: Data Table Core Model
// Description: Identifier, row, address, and query model types.
// Purpose: Group the passive data model consumed by the runtime.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The core model is purely descriptive: identifiers, the row contract, the
//! address map record, and condition-based query descriptions. Nothing in
//! this module performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod address;
pub mod identifiers;
pub mod query;
pub mod row;
