// crates/datatable-core/src/runtime/mod.rs
// ============================================================================
// Module: Data Table Runtime
// Description: Condition evaluation and the manager context.
// Purpose: Group the active runtime built on the core model and interfaces.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime executes query descriptions against [`crate::RecordStore`]
//! backends: the evaluator decides which JSON rows satisfy a condition set,
//! and the manager context drives the resolve/ensure/open/query/release
//! protocol for typed rows.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod evaluator;
pub mod manager;
