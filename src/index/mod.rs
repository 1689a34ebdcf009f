//! Index Module
//!
//! Maps truncated key prefixes to the batches that may hold a key.
//!
//! ## Responsibilities
//! - Decode the fixed-width index published for each version
//! - Ceiling search: point key → tie group of candidate batches
//! - Range search: key interval → contiguous run of candidate batches
//!
//! ## Entry Format
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ Key Prefix (P, zero-padded)  │ Batch Content Id (T = 44)    │
//! └──────────────────────────────┴──────────────────────────────┘
//! ... repeated; entries sorted ascending by prefix ...
//! ```
//!
//! Truncation to P bytes is lossy: several batches may share one prefix,
//! and a prefix cannot tell which side of a boundary a longer key falls on.
//! Both searches therefore return every batch tied at a boundary.

mod codec;
mod search;

use bytes::Bytes;

use crate::ledger::ContentId;

pub use codec::{decode_index, encode_index, pad_prefix};
pub use search::{find_candidates, find_candidates_for_range, find_candidates_from};

/// One boundary record of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Boundary key truncated / zero-padded to P bytes
    pub key_prefix: Bytes,
    /// Batch that may hold keys at or below this boundary
    pub batch_id: ContentId,
}

impl IndexEntry {
    /// Build an entry from an untruncated boundary key
    pub fn new(boundary_key: &[u8], batch_id: ContentId, prefix_len: usize) -> Self {
        Self {
            key_prefix: Bytes::from(pad_prefix(boundary_key, prefix_len)),
            batch_id,
        }
    }
}

/// Decoded index of one version
#[derive(Debug, Clone)]
pub struct Index {
    prefix_len: usize,
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new(prefix_len: usize, entries: Vec<IndexEntry>) -> Self {
        Self { prefix_len, entries }
    }

    /// Key prefix width (P)
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
