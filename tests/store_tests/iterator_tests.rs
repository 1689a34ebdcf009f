//! Tests for range iteration
//!
//! These tests verify:
//! - Forward and reverse iteration over half-open intervals
//! - Reverse stream is exactly the forward stream reversed
//! - Unbounded and empty intervals
//! - Duplicate keys across batches: earliest batch wins
//! - Cursor behaviour once exhausted

#[path = "../common/mod.rs"]
mod common;

use common::{content_id, mock_batch, mock_index, open_store, setup_fixture_store, vkey, PREFIX_LEN};
use ledgerkv::{LedgerError, LedgerIterator, LedgerStore, MemoryLedger};

// =============================================================================
// Helper Functions
// =============================================================================

fn collect(mut iter: LedgerIterator) -> Vec<(String, String)> {
    let mut items = Vec::new();
    while iter.valid() {
        let key = String::from_utf8(iter.key().unwrap().to_vec()).unwrap();
        let value = String::from_utf8(iter.value().unwrap().to_vec()).unwrap();
        items.push((key, value));
        iter.advance();
    }
    items
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Walk forward and reverse iterators in lockstep, as a caller would
fn check_interval(
    store: &LedgerStore<MemoryLedger>,
    start: &str,
    end: &str,
    keys: &[&str],
    values: &[&str],
) {
    let mut forward = store.iterator(&vkey(0, start), &vkey(0, end)).unwrap();
    let mut reverse = store.reverse_iterator(&vkey(0, start), &vkey(0, end)).unwrap();

    for (i, key) in keys.iter().enumerate() {
        let j = keys.len() - 1 - i;
        assert_eq!(forward.key(), Some(key.as_bytes()));
        assert_eq!(forward.value(), Some(values[i].as_bytes()));
        forward.advance();

        assert_eq!(reverse.key(), Some(keys[j].as_bytes()));
        assert_eq!(reverse.value(), Some(values[j].as_bytes()));
        reverse.advance();
    }

    assert!(!forward.valid());
    assert!(!reverse.valid());
}

// =============================================================================
// Interval Tests
// =============================================================================

#[test]
fn test_iterate_version_zero() {
    let store = setup_fixture_store();

    check_interval(&store, "a", "cc", &["aa"], &["v1"]);
    check_interval(&store, "aa", "cd", &["aa", "cc"], &["v1", "v2"]);
    check_interval(&store, "aa", "ce", &["aa", "cc", "cd"], &["v1", "v2", "v3"]);
    check_interval(
        &store,
        "aa",
        "cea",
        &["aa", "cc", "cd", "ce"],
        &["v1", "v2", "v3", "v4"],
    );
}

#[test]
fn test_iterate_version_one() {
    let store = setup_fixture_store();

    let iter = store.iterator(&vkey(1, "a"), &vkey(1, "z")).unwrap();
    assert_eq!(
        collect(iter),
        pairs(&[("ac", "v5"), ("cc", "v6"), ("ce", "v7")])
    );
}

#[test]
fn test_reverse_is_forward_reversed() {
    let store = setup_fixture_store();

    for (start, end) in [("", "z"), ("aa", "cd"), ("b", "ce"), ("cc", "cd"), ("cd", "cea")] {
        let forward = collect(store.iterator(&vkey(0, start), &vkey(0, end)).unwrap());
        let mut reverse = collect(store.reverse_iterator(&vkey(0, start), &vkey(0, end)).unwrap());
        reverse.reverse();
        assert_eq!(forward, reverse, "interval {:?}..{:?}", start, end);
    }
}

#[test]
fn test_unbounded_end() {
    let store = setup_fixture_store();

    let iter = store.iterator(&vkey(0, ""), &vkey(0, "")).unwrap();
    assert_eq!(iter.domain(), (&b""[..], None));
    assert_eq!(
        collect(iter),
        pairs(&[("aa", "v1"), ("cc", "v2"), ("cd", "v3"), ("ce", "v4")])
    );

    let iter = store.reverse_iterator(&vkey(0, "cc"), &vkey(0, "")).unwrap();
    assert_eq!(
        collect(iter),
        pairs(&[("ce", "v4"), ("cd", "v3"), ("cc", "v2")])
    );
}

#[test]
fn test_empty_interval() {
    let store = setup_fixture_store();

    let iter = store.iterator(&vkey(0, "cc"), &vkey(0, "cc")).unwrap();
    assert!(!iter.valid());
    assert!(iter.is_empty());

    let iter = store.iterator(&vkey(0, "ce"), &vkey(0, "aa")).unwrap();
    assert!(!iter.valid());
}

#[test]
fn test_interval_past_last_prefix() {
    let store = setup_fixture_store();

    let iter = store.iterator(&vkey(0, "x"), &vkey(0, "z")).unwrap();
    assert!(!iter.valid());
    assert_eq!(iter.key(), None);
    assert_eq!(iter.value(), None);
}

#[test]
fn test_duplicate_keys_earliest_batch_wins() {
    let ledger = MemoryLedger::new();
    ledger.insert_blob(content_id(0), mock_batch(&[("k", "first"), ("a", "1")]));
    ledger.insert_blob(content_id(1), mock_batch(&[("k", "second"), ("l", "x")]));
    ledger.insert_blob(content_id(50), mock_index(&["m", "m"], &[0, 1], PREFIX_LEN));
    ledger.set_version(0, content_id(50));
    let store = open_store(ledger);

    let forward = collect(store.iterator(&vkey(0, ""), &vkey(0, "")).unwrap());
    assert_eq!(forward, pairs(&[("a", "1"), ("k", "first"), ("l", "x")]));

    let reverse = collect(store.reverse_iterator(&vkey(0, ""), &vkey(0, "")).unwrap());
    assert_eq!(reverse, pairs(&[("l", "x"), ("k", "first"), ("a", "1")]));
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[test]
fn test_cursor_len_and_exhaustion() {
    let store = setup_fixture_store();

    let mut iter = store.iterator(&vkey(0, "aa"), &vkey(0, "ce")).unwrap();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.domain(), (&b"aa"[..], Some(&b"ce"[..])));

    iter.advance();
    assert_eq!(iter.len(), 2);
    iter.advance();
    iter.advance();
    assert!(!iter.valid());

    // Advancing past the end is a no-op
    iter.advance();
    assert!(!iter.valid());
    assert_eq!(iter.len(), 0);
    iter.close();
}

#[test]
fn test_close_releases_cursor() {
    let store = setup_fixture_store();

    let mut iter = store.iterator(&vkey(0, "aa"), &vkey(0, "ce")).unwrap();
    assert!(iter.valid());

    iter.close();
    assert!(!iter.valid());
    assert!(iter.is_empty());
    assert_eq!(iter.key(), None);

    // Closing twice is harmless
    iter.close();
    assert!(!iter.valid());
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_bounds_in_different_versions() {
    let store = setup_fixture_store();

    let result = store.iterator(&vkey(0, "a"), &vkey(1, "z"));
    assert!(matches!(
        result,
        Err(LedgerError::VersionMismatch { start: 0, end: 1 })
    ));
}

#[test]
fn test_unknown_version() {
    let store = setup_fixture_store();

    let result = store.iterator(&vkey(5, "a"), &vkey(5, "z"));
    assert!(matches!(result, Err(LedgerError::KeyNotFound(_))));
}

#[test]
fn test_iterate_after_close() {
    let store = setup_fixture_store();
    store.close().unwrap();

    let result = store.reverse_iterator(&vkey(0, "a"), &vkey(0, "z"));
    assert!(matches!(result, Err(LedgerError::Closed)));
}
