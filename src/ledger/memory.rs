//! In-memory ledger

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;

use super::{ContentId, Ledger};

/// Ledger held entirely in process memory
///
/// ## Concurrency:
/// - `blobs` / `versions`: RwLock (many concurrent readers)
/// - `fetch_count`: atomic counter, lets tests observe cache behaviour
#[derive(Default)]
pub struct MemoryLedger {
    blobs: RwLock<HashMap<ContentId, Bytes>>,
    versions: RwLock<HashMap<u64, ContentId>>,
    fetch_count: AtomicU64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a blob under its content id
    pub fn insert_blob(&self, id: ContentId, data: impl Into<Bytes>) {
        self.blobs.write().insert(id, data.into());
    }

    /// Point `version` at the content id of its index
    pub fn set_version(&self, version: u64, index_id: ContentId) {
        self.versions.write().insert(version, index_id);
    }

    /// Number of `fetch` calls served so far
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Ledger for MemoryLedger {
    fn resolve_version(&self, version: u64) -> Result<Option<ContentId>> {
        Ok(self.versions.read().get(&version).copied())
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<Bytes>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.blobs.read().get(id).cloned())
    }
}
