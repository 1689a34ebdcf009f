//! Directory-backed ledger
//!
//! Mirrors ledger content into a local directory.
//!
//! ## Layout
//! ```text
//! {root}/
//!   ├── versions.bin        (bincode map: version → index content id)
//!   └── blobs/
//!         └── {content id}  ('+' → '-', '/' → '_')
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{LedgerError, Result};

use super::{ContentId, Ledger};

/// Ledger whose blobs and version map live on the local filesystem
pub struct DirLedger {
    /// Root directory
    root: PathBuf,

    /// Version map, loaded on open and rewritten on every record
    versions: RwLock<BTreeMap<u64, ContentId>>,
}

impl DirLedger {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const VERSIONS_FILENAME: &'static str = "versions.bin";
    const BLOB_DIR: &'static str = "blobs";

    /// Open or create a ledger directory
    ///
    /// On open:
    /// 1. Create `{root}/blobs` if missing
    /// 2. Load the version map if it exists
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(Self::BLOB_DIR))?;

        let versions_path = root.join(Self::VERSIONS_FILENAME);
        let versions = if versions_path.exists() {
            Self::load_versions(&versions_path)?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(root = %root.display(), versions = versions.len(), "opened ledger directory");

        Ok(Self {
            root,
            versions: RwLock::new(versions),
        })
    }

    /// Write a blob under its content id (overwrites are harmless: content is immutable)
    pub fn store_blob(&self, id: &ContentId, data: &[u8]) -> Result<()> {
        fs::write(self.blob_path(id), data)?;
        Ok(())
    }

    /// Record the index content id for `version` and persist the map
    pub fn record_version(&self, version: u64, index_id: ContentId) -> Result<()> {
        let mut versions = self.versions.write();
        versions.insert(version, index_id);

        let encoded: BTreeMap<u64, String> = versions
            .iter()
            .map(|(v, id)| (*v, id.as_str().to_string()))
            .collect();
        let bytes = bincode::serialize(&encoded)
            .map_err(|e| LedgerError::Serialization(format!("version map: {}", e)))?;

        // Write-then-rename so a crash never leaves a torn map
        let tmp = self.root.join(format!("{}.tmp", Self::VERSIONS_FILENAME));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.root.join(Self::VERSIONS_FILENAME))?;
        Ok(())
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of recorded versions
    pub fn version_count(&self) -> usize {
        self.versions.read().len()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn blob_path(&self, id: &ContentId) -> PathBuf {
        self.root.join(Self::BLOB_DIR).join(id.to_file_name())
    }

    fn load_versions(path: &Path) -> Result<BTreeMap<u64, ContentId>> {
        let bytes = fs::read(path)?;
        let encoded: BTreeMap<u64, String> = bincode::deserialize(&bytes)
            .map_err(|e| LedgerError::Serialization(format!("version map: {}", e)))?;

        encoded
            .into_iter()
            .map(|(version, id)| -> Result<(u64, ContentId)> { Ok((version, id.parse()?)) })
            .collect()
    }
}

impl Ledger for DirLedger {
    fn resolve_version(&self, version: u64) -> Result<Option<ContentId>> {
        Ok(self.versions.read().get(&version).copied())
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<Bytes>> {
        match fs::read(self.blob_path(id)) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::Transport(format!("reading blob {}: {}", id, e))),
        }
    }
}
