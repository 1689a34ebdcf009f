//! Batch payloads
//!
//! A batch is a JSON object of text keys to text values, committed to the
//! ledger as one blob. Decoded into byte-ordered form for merging.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::{LedgerError, Result};
use crate::ledger::ContentId;

/// Decoded batch: raw key → value, in byte order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Batch {
    /// Parse a batch payload fetched for `id`
    pub fn decode(id: &ContentId, payload: &[u8]) -> Result<Self> {
        let map: BTreeMap<String, String> = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(batch = %id, error = %e, "batch payload is not a key-value map");
            LedgerError::CorruptIndex(format!("batch {} is not a key-value map: {}", id, e))
        })?;

        Ok(Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k.into_bytes(), v.into_bytes()))
                .collect(),
        })
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Entries with `start <= key < end` (`end = None` means unbounded)
    pub fn range<'a>(
        &'a self,
        start: &'a [u8],
        end: Option<&'a [u8]>,
    ) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        self.entries
            .range::<[u8], _>((Bound::Included(start), Bound::Unbounded))
            .take_while(move |(k, _)| end.map_or(true, |end| k.as_slice() < end))
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
