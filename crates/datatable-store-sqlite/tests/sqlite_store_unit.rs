// crates/datatable-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Store Unit Tests
// Description: Targeted tests for the SQLite record store adapter.
// Purpose: Validate round trips, predicate scans, counts, open modes,
//          identifier rejection, and release idempotence.
// ============================================================================

//! ## Overview
//! Unit-level tests for adapter invariants:
//! - Keyed round trips and absent keys as `Ok(None)`
//! - Predicate scans and count agreement under AND/OR combination
//! - Storage-order full scans
//! - Missing-file failure vs. create mode
//! - Bytes-backed read-only handles
//! - Identifier rejection before SQL interpolation
//! - Idempotent release

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;

use datatable_core::BoolOp;
use datatable_core::CompareOp;
use datatable_core::ConditionSet;
use datatable_core::FieldName;
use datatable_core::QueryCondition;
use datatable_core::RecordStore;
use datatable_core::RowKey;
use datatable_core::StoreError;
use datatable_core::TableName;
use datatable_store_sqlite::OpenMode;
use datatable_store_sqlite::SqliteRecordStore;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn item_table() -> TableName {
    TableName::new("Item")
}

fn open_item_store(path: &Path, mode: OpenMode) -> SqliteRecordStore {
    let mut store = SqliteRecordStore::from_path(path, mode, 1_000);
    store.ensure_table(&item_table(), &FieldName::new("Id")).expect("ensure");
    store.open().expect("open");
    store
}

fn seed_items(path: &Path) {
    let mut store = open_item_store(path, OpenMode::CreateIfMissing);
    for (id, name, age) in [(1_i64, "Sword", 12_i64), (2, "Shield", 30), (3, "Potion", 70)] {
        store
            .insert(
                &item_table(),
                &RowKey::Integer(id),
                &json!({"Id": id, "Name": name, "Age": age}),
            )
            .expect("insert");
    }
    store.close();
}

fn age_set(ops: Vec<BoolOp>) -> ConditionSet {
    ConditionSet::new(
        vec![
            QueryCondition::new("Age", CompareOp::GreaterThanOrEqual, json!(18)),
            QueryCondition::new("Age", CompareOp::LessThan, json!(65)),
        ],
        ops,
    )
}

// ============================================================================
// SECTION: Round Trip Tests
// ============================================================================

#[test]
fn keyed_select_round_trips_written_rows() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let store = open_item_store(&path, OpenMode::ReadWrite);
    let row = store.select(&item_table(), &RowKey::Integer(2)).expect("select");
    assert_eq!(row, Some(json!({"Id": 2, "Name": "Shield", "Age": 30})));
    let missing = store.select(&item_table(), &RowKey::Integer(99)).expect("select");
    assert_eq!(missing, None);
}

#[test]
fn upsert_replaces_the_existing_row() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let mut store = open_item_store(&path, OpenMode::ReadWrite);
    store
        .insert(
            &item_table(),
            &RowKey::Integer(2),
            &json!({"Id": 2, "Name": "Tower Shield", "Age": 30}),
        )
        .expect("upsert");
    let row = store.select(&item_table(), &RowKey::Integer(2)).expect("select");
    assert_eq!(row, Some(json!({"Id": 2, "Name": "Tower Shield", "Age": 30})));
    assert_eq!(store.count(&item_table(), None).expect("count"), 3);
}

#[test]
fn select_all_preserves_storage_order() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let store = open_item_store(&path, OpenMode::ReadOnly);
    let rows = store.select_all(&item_table()).expect("select all");
    let names: Vec<&str> =
        rows.iter().filter_map(|row| row.get("Name").and_then(|name| name.as_str())).collect();
    assert_eq!(names, ["Sword", "Shield", "Potion"]);
}

// ============================================================================
// SECTION: Predicate Tests
// ============================================================================

#[test]
fn conditional_select_and_count_agree() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);
    let store = open_item_store(&path, OpenMode::ReadOnly);

    let and_set = age_set(vec![BoolOp::And]);
    let matches = store.select_where(&item_table(), &and_set).expect("select where");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].get("Name"), Some(&json!("Shield")));
    assert_eq!(
        store.count(&item_table(), Some(&and_set)).expect("count"),
        u64::try_from(matches.len()).expect("count fits")
    );

    let or_set = age_set(vec![BoolOp::Or]);
    assert_eq!(store.count(&item_table(), Some(&or_set)).expect("count"), 3);
}

#[test]
fn empty_condition_set_counts_every_row() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);
    let store = open_item_store(&path, OpenMode::ReadOnly);

    let empty = ConditionSet::new(Vec::new(), Vec::new());
    assert_eq!(store.count(&item_table(), Some(&empty)).expect("count"), 3);
    assert_eq!(store.count(&item_table(), None).expect("count"), 3);
}

// ============================================================================
// SECTION: Open Mode Tests
// ============================================================================

#[test]
fn missing_file_fails_outside_create_mode() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db9");

    for mode in [OpenMode::ReadOnly, OpenMode::ReadWrite] {
        let mut store = SqliteRecordStore::from_path(&path, mode, 1_000);
        store.ensure_table(&item_table(), &FieldName::new("Id")).expect("ensure");
        assert!(matches!(store.open(), Err(StoreError::Io(_))));
    }
}

#[test]
fn bytes_source_serves_read_only_queries() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);
    let bytes = fs::read(&path).expect("read db bytes");

    let mut store = SqliteRecordStore::from_bytes(bytes, 1_000);
    store.ensure_table(&item_table(), &FieldName::new("Id")).expect("ensure");
    store.open().expect("open");
    assert_eq!(store.count(&item_table(), None).expect("count"), 3);
    let row = store.select(&item_table(), &RowKey::Integer(1)).expect("select");
    assert_eq!(row, Some(json!({"Id": 1, "Name": "Sword", "Age": 12})));
    let result = store.insert(&item_table(), &RowKey::Integer(9), &json!({"Id": 9}));
    assert!(matches!(result, Err(StoreError::Invalid(_))));
}

#[test]
fn read_only_open_rejects_missing_tables() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let mut store = SqliteRecordStore::from_path(&path, OpenMode::ReadOnly, 1_000);
    store.ensure_table(&TableName::new("Npc"), &FieldName::new("Id")).expect("ensure");
    assert!(matches!(store.open(), Err(StoreError::Invalid(_))));
}

// ============================================================================
// SECTION: Contract Tests
// ============================================================================

#[test]
fn hostile_identifiers_are_rejected_before_sql() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);
    let mut store = SqliteRecordStore::from_path(&path, OpenMode::ReadWrite, 1_000);

    let hostile = TableName::new("Item\"; DROP TABLE Item; --");
    assert!(matches!(
        store.ensure_table(&hostile, &FieldName::new("Id")),
        Err(StoreError::Invalid(_))
    ));
    store.ensure_table(&item_table(), &FieldName::new("Id")).expect("ensure");
    store.open().expect("open");
    assert!(matches!(
        store.select(&hostile, &RowKey::Integer(1)),
        Err(StoreError::Invalid(_))
    ));
}

#[test]
fn ensure_after_open_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let mut store = open_item_store(&path, OpenMode::ReadWrite);
    let result = store.ensure_table(&TableName::new("Npc"), &FieldName::new("Id"));
    assert!(matches!(result, Err(StoreError::Invalid(_))));
}

#[test]
fn queries_before_open_report_a_closed_handle() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let store = SqliteRecordStore::from_path(&path, OpenMode::ReadOnly, 1_000);
    assert!(matches!(
        store.select(&item_table(), &RowKey::Integer(1)),
        Err(StoreError::Closed(_))
    ));
}

#[test]
fn release_is_idempotent_and_queries_fail_after_it() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db2");
    seed_items(&path);

    let mut store = open_item_store(&path, OpenMode::ReadWrite);
    store.close();
    store.close();
    assert!(matches!(
        store.select(&item_table(), &RowKey::Integer(1)),
        Err(StoreError::Closed(_))
    ));
    // Reopening the same handle applies the registered schema again.
    store.open().expect("reopen");
    assert_eq!(store.count(&item_table(), None).expect("count"), 3);
}

#[test]
fn text_keys_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("db3");
    let table = TableName::new("Locale");
    let mut store = SqliteRecordStore::from_path(&path, OpenMode::CreateIfMissing, 1_000);
    store.ensure_table(&table, &FieldName::new("Key")).expect("ensure");
    store.open().expect("open");
    store
        .insert(
            &table,
            &RowKey::Text("greeting".to_string()),
            &json!({"Key": "greeting", "Text": "hello"}),
        )
        .expect("insert");
    let row = store.select(&table, &RowKey::from("greeting")).expect("select");
    assert_eq!(row, Some(json!({"Key": "greeting", "Text": "hello"})));
    assert_eq!(store.select(&table, &RowKey::from("farewell")).expect("select"), None);
}
