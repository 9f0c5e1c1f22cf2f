// crates/datatable-store-sqlite/src/lib.rs
// ============================================================================
// Module: Data Table SQLite Store
// Description: SQLite-backed record store adapter and file resolver.
// Purpose: Implement the core storage interfaces over physical SQLite files.
// Dependencies: datatable-core, rusqlite, serde_json, tempfile, thiserror
// ============================================================================

//! ## Overview
//! This crate binds the data table layer to `SQLite`. A
//! [`SqliteRecordStore`] is a per-operation handle over one physical
//! database file (or over in-memory bytes for bundled resources); a
//! [`SqliteStoreResolver`] maps integer local addresses to the `db{n}` files
//! under a storage layout and hands out fresh handles.
//!
//! Stored rows are JSON payloads keyed by the canonical primary-key string;
//! payloads are untrusted and decoding fails closed on corruption.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod resolver;
pub mod store;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use resolver::ResourceLoader;
pub use resolver::SqliteStoreResolver;
pub use resolver::StorageLayout;
pub use resolver::db_file_name;
pub use store::OpenMode;
pub use store::SqliteRecordStore;
pub use store::SqliteStoreError;
