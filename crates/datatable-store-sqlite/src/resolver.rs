// crates/datatable-store-sqlite/src/resolver.rs
// ============================================================================
// Module: SQLite Store Resolver
// Description: Maps local addresses to physical db files per storage layout.
// Purpose: Bind fresh record store handles for the manager's query protocol.
// Dependencies: datatable-core, crate::store
// ============================================================================

//! ## Overview
//! Physical files follow the `db{n}` naming convention: `db1` is the
//! address-map file, data files start at `db2`. The resolver binds a fresh
//! [`SqliteRecordStore`] per request according to one of three layouts:
//! a writable persistent directory, a read-only streaming directory, or a
//! bundled-resource loader that supplies raw database bytes by file name.
//!
//! Only the address-map resolution may create a missing file, and only on
//! the persistent layout; data files are always prepared offline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use datatable_core::LocalAddress;
use datatable_core::RESERVED_ADDRESS_MAP_ADDRESS;
use datatable_core::RecordStore;
use datatable_core::StoreError;
use datatable_core::StoreResolver;

use crate::store::DEFAULT_BUSY_TIMEOUT_MS;
use crate::store::OpenMode;
use crate::store::SqliteRecordStore;

// ============================================================================
// SECTION: Naming
// ============================================================================

/// Returns the physical file name for a local address.
///
/// The convention is owned by the data-preparation tooling; keep it stable
/// for file compatibility.
#[must_use]
pub fn db_file_name(address: LocalAddress) -> String {
    format!("db{}", address.get())
}

// ============================================================================
// SECTION: Resource Loader
// ============================================================================

/// Supplies raw database bytes for a named bundled resource.
pub trait ResourceLoader {
    /// Loads the bytes of the named resource.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the resource is missing or unreadable.
    fn load(&self, name: &str) -> Result<Vec<u8>, StoreError>;
}

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Storage layout the resolver binds files under.
///
/// # Invariants
/// - Exactly one mode is active per resolver; the modes are mutually
///   exclusive by construction.
pub enum StorageLayout {
    /// Writable directory of database files.
    Persistent {
        /// Root directory holding the `db{n}` files.
        root: PathBuf,
    },
    /// Read-only directory of database files.
    Streaming {
        /// Root directory holding the `db{n}` files.
        root: PathBuf,
    },
    /// Bundled resources resolved through a loader by file name.
    Resources {
        /// Loader supplying raw database bytes.
        loader: Box<dyn ResourceLoader>,
    },
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Binds fresh `SQLite` record store handles per storage layout.
pub struct SqliteStoreResolver {
    /// Active storage layout.
    layout: StorageLayout,
    /// Busy timeout applied to every handle (ms).
    busy_timeout_ms: u64,
}

impl SqliteStoreResolver {
    /// Creates a resolver with the default busy timeout.
    #[must_use]
    pub const fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Creates a resolver with an explicit busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(layout: StorageLayout, busy_timeout_ms: u64) -> Self {
        Self {
            layout,
            busy_timeout_ms,
        }
    }

    /// Binds a handle for `name`, with `path_mode` selecting the open mode
    /// used on the persistent layout; streaming is always read-only.
    fn bind(&self, name: &str, path_mode: OpenMode) -> Result<Box<dyn RecordStore>, StoreError> {
        match &self.layout {
            StorageLayout::Persistent { root } => Ok(Box::new(SqliteRecordStore::from_path(
                root.join(name),
                path_mode,
                self.busy_timeout_ms,
            ))),
            StorageLayout::Streaming { root } => Ok(Box::new(SqliteRecordStore::from_path(
                root.join(name),
                OpenMode::ReadOnly,
                self.busy_timeout_ms,
            ))),
            StorageLayout::Resources { loader } => {
                let bytes = loader.load(name)?;
                Ok(Box::new(SqliteRecordStore::from_bytes(bytes, self.busy_timeout_ms)))
            }
        }
    }
}

impl StoreResolver for SqliteStoreResolver {
    fn resolve(&self, address: LocalAddress) -> Result<Box<dyn RecordStore>, StoreError> {
        if !address.is_assigned() {
            return Err(StoreError::Invalid(format!(
                "address {address} does not name a data file"
            )));
        }
        self.bind(&db_file_name(address), OpenMode::ReadWrite)
    }

    fn resolve_address_map(&self) -> Result<Box<dyn RecordStore>, StoreError> {
        self.bind(&db_file_name(RESERVED_ADDRESS_MAP_ADDRESS), OpenMode::CreateIfMissing)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
