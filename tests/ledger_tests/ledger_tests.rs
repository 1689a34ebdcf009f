//! Tests for Ledger implementations
//!
//! These tests verify:
//! - MemoryLedger version resolution and blob fetch
//! - DirLedger layout, persistence across reopen, and missing blobs
//! - A DirLedger-backed store answers the same queries as the fixture

#[path = "../common/mod.rs"]
mod common;

use std::fs;
use std::sync::Arc;

use common::{content_id, mock_batch, mock_index, test_config, vkey, PREFIX_LEN};
use ledgerkv::{DirLedger, Ledger, LedgerError, LedgerStore, MemoryLedger};
use tempfile::TempDir;

// =============================================================================
// MemoryLedger Tests
// =============================================================================

#[test]
fn test_memory_resolve_unknown_version() {
    let ledger = MemoryLedger::new();
    assert_eq!(ledger.resolve_version(0).unwrap(), None);
}

#[test]
fn test_memory_set_and_resolve_version() {
    let ledger = MemoryLedger::new();
    ledger.set_version(3, content_id(9));

    assert_eq!(ledger.resolve_version(3).unwrap(), Some(content_id(9)));
}

#[test]
fn test_memory_fetch_blob() {
    let ledger = MemoryLedger::new();
    ledger.insert_blob(content_id(1), b"payload".to_vec());

    let data = ledger.fetch(&content_id(1)).unwrap().unwrap();
    assert_eq!(data.as_ref(), b"payload");
    assert_eq!(ledger.fetch(&content_id(2)).unwrap(), None);
    assert_eq!(ledger.fetch_count(), 2);
}

// =============================================================================
// DirLedger Tests
// =============================================================================

#[test]
fn test_dir_open_creates_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("mirror");

    let ledger = DirLedger::open(&root).unwrap();

    assert!(root.join("blobs").is_dir());
    assert_eq!(ledger.root(), root.as_path());
    assert_eq!(ledger.version_count(), 0);
}

#[test]
fn test_dir_store_and_fetch_blob() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = DirLedger::open(temp_dir.path()).unwrap();

    ledger.store_blob(&content_id(5), b"hello").unwrap();

    let data = ledger.fetch(&content_id(5)).unwrap().unwrap();
    assert_eq!(data.as_ref(), b"hello");
}

#[test]
fn test_dir_fetch_missing_blob() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = DirLedger::open(temp_dir.path()).unwrap();

    assert_eq!(ledger.fetch(&content_id(5)).unwrap(), None);
}

#[test]
fn test_dir_versions_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let ledger = DirLedger::open(temp_dir.path()).unwrap();
        ledger.record_version(0, content_id(10)).unwrap();
        ledger.record_version(1, content_id(11)).unwrap();
    }

    let ledger = DirLedger::open(temp_dir.path()).unwrap();
    assert_eq!(ledger.version_count(), 2);
    assert_eq!(ledger.resolve_version(0).unwrap(), Some(content_id(10)));
    assert_eq!(ledger.resolve_version(1).unwrap(), Some(content_id(11)));
    assert_eq!(ledger.resolve_version(2).unwrap(), None);
}

#[test]
fn test_dir_corrupt_version_map() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("versions.bin"), b"\xff\xff").unwrap();

    let result = DirLedger::open(temp_dir.path());
    assert!(matches!(result, Err(LedgerError::Serialization(_))));
}

#[test]
fn test_dir_backed_store_get() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = DirLedger::open(temp_dir.path()).unwrap();

    ledger.store_blob(&content_id(0), &mock_batch(&[("aa", "v1")])).unwrap();
    ledger.store_blob(&content_id(1), &mock_batch(&[("cc", "v2")])).unwrap();
    let index = mock_index(&["ab", "cd"], &[0, 1], PREFIX_LEN);
    ledger.store_blob(&content_id(100), &index).unwrap();
    ledger.record_version(0, content_id(100)).unwrap();

    let store = LedgerStore::open(test_config(), Arc::new(ledger)).unwrap();

    assert_eq!(store.get(&vkey(0, "aa")).unwrap(), b"v1");
    assert_eq!(store.get(&vkey(0, "cc")).unwrap(), b"v2");
    assert!(!store.has(&vkey(0, "zz")).unwrap());
}
