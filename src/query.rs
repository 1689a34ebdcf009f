//! Point queries: get() and has()
//!
//! A key resolves to the tie group of its ceiling entry. Candidates are
//! checked in index order and the first batch holding the key wins.

use crate::error::{LedgerError, Result};
use crate::index::find_candidates;
use crate::key::VersionedKey;
use crate::ledger::Ledger;
use crate::store::LedgerStore;

impl<L: Ledger + 'static> LedgerStore<L> {
    /// Get the value of a versioned key
    ///
    /// Steps:
    /// 1. Split into (version, raw key)
    /// 2. Load the version's index
    /// 3. Ceiling search for the candidate tie group
    /// 4. Fetch candidates, return the first that holds the key
    ///
    /// # Errors
    ///
    /// `KeyNotFound` when the version is unknown or no candidate holds the
    /// key; `CorruptIndex`, `MissingContent` and transport errors otherwise.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let (version, raw_key) = VersionedKey::split(key)?;

        let index = self.load_index(version, raw_key)?;
        let candidates = find_candidates(raw_key, &index);

        tracing::debug!(
            version,
            key = %String::from_utf8_lossy(raw_key),
            candidates = candidates.len(),
            "get"
        );

        if candidates.is_empty() {
            return Err(LedgerError::KeyNotFound(raw_key.to_vec()));
        }

        let batches = self.fetch_batches(candidates)?;
        for (entry, batch) in candidates.iter().zip(&batches) {
            if let Some(value) = batch.get(raw_key) {
                tracing::trace!(batch = %entry.batch_id, "key found");
                return Ok(value.to_vec());
            }
        }

        Err(LedgerError::KeyNotFound(raw_key.to_vec()))
    }

    /// Check whether a versioned key exists
    ///
    /// `true` iff [`get`](Self::get) would succeed. Only `KeyNotFound` is
    /// turned into `false`; every other error is returned.
    pub fn has(&self, key: &[u8]) -> Result<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
