//! Ledger Module
//!
//! The two capabilities the read path consumes from the outside world.
//!
//! ## Responsibilities
//! - Resolve a version number to the content id of that version's index
//! - Fetch the raw bytes addressed by a content id
//!
//! Both are immutable once published, so results may be cached forever.
//!
//! ## Implementations
//! - [`MemoryLedger`]: in-process maps, for tests and embedding
//! - [`DirLedger`]: blobs and a version map stored under a local directory

mod content_id;
mod dir;
mod memory;

use bytes::Bytes;

use crate::error::Result;

pub use content_id::{ContentId, CONTENT_ID_LEN};
pub use dir::DirLedger;
pub use memory::MemoryLedger;

/// Access to an append-only, content-addressed ledger
///
/// `Ok(None)` means "not found"; `Err` is a transport failure and is
/// propagated to the caller unchanged.
pub trait Ledger: Send + Sync {
    /// Look up the content id of the index published for `version`
    fn resolve_version(&self, version: u64) -> Result<Option<ContentId>>;

    /// Fetch the blob addressed by `id`
    fn fetch(&self, id: &ContentId) -> Result<Option<Bytes>>;

    /// Release any resources held by the ledger client
    fn close(&self) -> Result<()> {
        Ok(())
    }
}
