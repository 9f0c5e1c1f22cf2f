// system-tests/src/lib.rs
// ============================================================================
// Module: Data Table System Tests Library
// Description: Shared row types and data-preparation helpers.
// Purpose: Provide common utilities for data table system-test binaries.
// Dependencies: datatable-core, datatable-store-sqlite, serde, serde_json
// ============================================================================

//! ## Overview
//! This crate hosts the shared fixtures used by the system-test binaries in
//! `system-tests/tests`: sample row types and helpers that prepare physical
//! database files the way the offline data-preparation tooling does.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod prep;
