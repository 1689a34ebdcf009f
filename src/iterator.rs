//! Range queries: iterator() and reverse_iterator()
//!
//! Batches hold unordered, possibly overlapping key sets, so the whole
//! interval is resolved and merged before the first element is yielded.
//! The result is a finite, forward-only cursor over that materialised,
//! sorted sequence.

use std::collections::BTreeMap;

use crate::error::{LedgerError, Result};
use crate::index::{find_candidates_for_range, find_candidates_from};
use crate::key::VersionedKey;
use crate::ledger::Ledger;
use crate::store::LedgerStore;

/// Iteration order of a [`LedgerIterator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
}

/// One-shot cursor over the key-value pairs of a half-open interval
#[derive(Debug)]
pub struct LedgerIterator {
    items: Vec<(Vec<u8>, Vec<u8>)>,
    /// Position of the current item
    pos: usize,
    start: Vec<u8>,
    end: Option<Vec<u8>>,
}

impl LedgerIterator {
    fn new(items: Vec<(Vec<u8>, Vec<u8>)>, start: &[u8], end: Option<&[u8]>) -> Self {
        Self {
            items,
            pos: 0,
            start: start.to_vec(),
            end: end.map(<[u8]>::to_vec),
        }
    }

    /// False once advanced past the last element
    pub fn valid(&self) -> bool {
        self.pos < self.items.len()
    }

    /// Raw key of the current element
    pub fn key(&self) -> Option<&[u8]> {
        self.items.get(self.pos).map(|(k, _)| k.as_slice())
    }

    /// Value of the current element
    pub fn value(&self) -> Option<&[u8]> {
        self.items.get(self.pos).map(|(_, v)| v.as_slice())
    }

    /// Move to the next element; no-op once exhausted
    pub fn advance(&mut self) {
        if self.valid() {
            self.pos += 1;
        }
    }

    /// Raw interval bounds `[start, end)`, `None` end meaning unbounded
    pub fn domain(&self) -> (&[u8], Option<&[u8]>) {
        (self.start.as_slice(), self.end.as_deref())
    }

    /// Elements not yet advanced past (including the current one)
    pub fn len(&self) -> usize {
        self.items.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release the materialised elements; the iterator is invalid afterwards
    pub fn close(&mut self) {
        self.items = Vec::new();
        self.pos = 0;
    }
}

impl<L: Ledger + 'static> LedgerStore<L> {
    /// Ascending iterator over `[start, end)`
    ///
    /// Both bounds are versioned keys of the same version. An `end` holding
    /// only the version header leaves the interval unbounded above.
    pub fn iterator(&self, start: &[u8], end: &[u8]) -> Result<LedgerIterator> {
        self.range(start, end, Direction::Forward)
    }

    /// Descending iterator over `[start, end)`
    pub fn reverse_iterator(&self, start: &[u8], end: &[u8]) -> Result<LedgerIterator> {
        self.range(start, end, Direction::Reverse)
    }

    fn range(&self, start: &[u8], end: &[u8], direction: Direction) -> Result<LedgerIterator> {
        self.ensure_open()?;
        let (version, start) = VersionedKey::split(start)?;
        let (end_version, end) = VersionedKey::split(end)?;
        if version != end_version {
            return Err(LedgerError::VersionMismatch {
                start: version,
                end: end_version,
            });
        }

        let end = (!end.is_empty()).then_some(end);
        if end.is_some_and(|end| start >= end) {
            return Ok(LedgerIterator::new(Vec::new(), start, end));
        }

        let index = self.load_index(version, start)?;
        let candidates = match end {
            Some(end) => find_candidates_for_range(start, end, &index),
            None => find_candidates_from(start, &index),
        };

        tracing::debug!(
            version,
            start = %String::from_utf8_lossy(start),
            end = %end.map(String::from_utf8_lossy).unwrap_or_default(),
            candidates = candidates.len(),
            ?direction,
            "range"
        );

        let batches = self.fetch_batches(candidates)?;

        // Batches arrive in index order: the earliest holder of a key wins
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        for batch in &batches {
            for (key, value) in batch.range(start, end) {
                merged.entry(key.to_vec()).or_insert_with(|| value.to_vec());
            }
        }

        let mut items: Vec<(Vec<u8>, Vec<u8>)> = merged.into_iter().collect();
        if direction == Direction::Reverse {
            items.reverse();
        }

        Ok(LedgerIterator::new(items, start, end))
    }
}
