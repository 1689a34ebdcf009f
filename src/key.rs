//! Versioned keys
//!
//! ```text
//! ┌──────────────────────────┬─────────────────────────────┐
//! │ Version (8, u64 BE)      │ Raw Key (variable)          │
//! └──────────────────────────┴─────────────────────────────┘
//! ```

use crate::error::{LedgerError, Result};

/// Size of the version header
pub const VERSION_LEN: usize = 8;

/// Helpers for the `version || raw key` key layout
pub struct VersionedKey;

impl VersionedKey {
    /// Split a versioned key into its version and raw key
    pub fn split(key: &[u8]) -> Result<(u64, &[u8])> {
        if key.len() < VERSION_LEN {
            return Err(LedgerError::InvalidKey(format!(
                "versioned key needs at least {} bytes, got {}",
                VERSION_LEN,
                key.len()
            )));
        }
        let (version, raw) = key.split_at(VERSION_LEN);
        let version = u64::from_be_bytes(version.try_into().map_err(|_| {
            LedgerError::InvalidKey("malformed version header".to_string())
        })?);
        Ok((version, raw))
    }

    /// Prepend the big-endian version to a raw key
    pub fn encode(version: u64, raw_key: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(VERSION_LEN + raw_key.len());
        key.extend_from_slice(&version.to_be_bytes());
        key.extend_from_slice(raw_key);
        key
    }
}
