//! Store Module
//!
//! The read-only store that composes the ledger, the index and the caches.
//!
//! ## Responsibilities
//! - Resolve a version to its decoded index (memoised, cached)
//! - Hold the batch cache shared by point and range queries
//! - Lifecycle: open, close (idempotent)
//!
//! Point queries live in `query.rs`, range queries in `iterator.rs`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::batch::Batch;
use crate::cache::ContentCache;
use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::index::{decode_index, Index};
use crate::ledger::{ContentId, Ledger};

/// Read path over a content-addressed ledger
///
/// ## Concurrency:
/// - All query methods take `&self`; share the store behind an `Arc`
/// - `versions`: RwLock, written once per version on first resolution
/// - Caches: internal Mutex, values are `Arc`s of immutable content
/// - `closed`: atomic flag checked at the start of every query
pub struct LedgerStore<L: Ledger + 'static> {
    /// Store configuration
    config: Config,

    /// Ledger collaborator (version map + blob fetch)
    ledger: Arc<L>,

    /// Version → index content id; published once, never changes
    versions: RwLock<HashMap<u64, ContentId>>,

    /// Decoded indices keyed by index content id
    indices: ContentCache<Arc<Index>>,

    /// Decoded batches keyed by batch content id
    batches: ContentCache<Arc<Batch>>,

    closed: AtomicBool,
}

impl<L: Ledger + 'static> LedgerStore<L> {
    /// Open a store over `ledger`
    pub fn open(config: Config, ledger: Arc<L>) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            prefix_len = config.prefix_len,
            cache_capacity = config.cache_capacity,
            fetch_workers = config.fetch_workers,
            "opening ledger store"
        );

        Ok(Self {
            indices: ContentCache::new(config.cache_capacity),
            batches: ContentCache::new(config.cache_capacity),
            config,
            ledger,
            versions: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Release caches and close the ledger client
    ///
    /// Idempotent: only the first call does any work. Queries issued
    /// afterwards fail with [`LedgerError::Closed`].
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.versions.write().clear();
        self.indices.clear();
        self.batches.clear();

        tracing::info!("ledger store closed");
        self.ledger.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the ledger collaborator
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Combined (hits, misses) of the index and batch caches
    pub fn cache_stats(&self) -> (usize, usize) {
        let (index_hits, index_misses) = self.indices.stats();
        let (batch_hits, batch_misses) = self.batches.stats();
        (index_hits + batch_hits, index_misses + batch_misses)
    }

    pub(crate) fn batch_cache(&self) -> &ContentCache<Arc<Batch>> {
        &self.batches
    }

    // =========================================================================
    // Index Resolution
    // =========================================================================

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(LedgerError::Closed);
        }
        Ok(())
    }

    /// Load the decoded index of `version`
    ///
    /// An unknown version is reported as `KeyNotFound(raw_key)`: from the
    /// caller's point of view the key simply does not exist.
    pub(crate) fn load_index(&self, version: u64, raw_key: &[u8]) -> Result<Arc<Index>> {
        let index_id = match self.resolve_version(version)? {
            Some(id) => id,
            None => {
                tracing::debug!(version, "unknown version");
                return Err(LedgerError::KeyNotFound(raw_key.to_vec()));
            }
        };

        if let Some(index) = self.indices.get(&index_id) {
            return Ok(index);
        }

        let buf = self
            .fetch_with_deadline(&index_id)?
            .ok_or(LedgerError::MissingContent(index_id))?;

        let index = decode_index(&buf, self.config.prefix_len).map_err(|e| {
            tracing::warn!(version, index = %index_id, error = %e, "failed to decode index");
            e
        })?;

        tracing::debug!(version, index = %index_id, entries = index.len(), "loaded index");

        let index = Arc::new(index);
        self.indices.insert(index_id, Arc::clone(&index));
        Ok(index)
    }

    fn resolve_version(&self, version: u64) -> Result<Option<ContentId>> {
        if let Some(id) = self.versions.read().get(&version) {
            return Ok(Some(*id));
        }

        let resolved = self.ledger.resolve_version(version)?;
        if let Some(id) = resolved {
            self.versions.write().insert(version, id);
        }
        Ok(resolved)
    }
}
