//! Error types for LedgerKV
//!
//! Provides a unified error type for all operations.

use std::time::Duration;

use thiserror::Error;

use crate::ledger::ContentId;

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Unified error type for LedgerKV operations
#[derive(Debug, Error)]
pub enum LedgerError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// Version unknown, or no candidate batch holds the key
    #[error("Key not found: {}", String::from_utf8_lossy(.0))]
    KeyNotFound(Vec<u8>),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Iterator bounds span versions {start} and {end}")]
    VersionMismatch { start: u64, end: u64 },

    // -------------------------------------------------------------------------
    // Content Errors
    // -------------------------------------------------------------------------
    /// Malformed index buffer or unparseable batch payload
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    #[error("Content not found on ledger: {0}")]
    MissingContent(ContentId),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Fetch deadline of {0:?} elapsed")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration / Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store is closed")]
    Closed,
}

impl LedgerError {
    /// True for the one condition callers treat as "absent"
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::KeyNotFound(_))
    }
}
