//! # LedgerKV
//!
//! The read path of a key-value store whose backing medium is an
//! append-only, content-addressed, immutable ledger:
//! - Fixed-width index mapping truncated key prefixes to batch ids
//! - Ceiling and range search tolerant of truncation ambiguity
//! - Point lookups and ordered forward/reverse iteration per version
//! - Concurrent batch fetches with a shared cache of immutable content
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 LedgerStore (get / has / iter)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ versioned key
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Ledger    │          │    Index    │
//!   │ version→id  │─────────►│ codec+search│
//!   │ id→bytes    │          └──────┬──────┘
//!   └──────┬──────┘                 │ candidate batch ids
//!          │                        ▼
//!          │                ┌─────────────┐
//!          └───────────────►│ Fetch fan-  │
//!                           │ out + cache │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod key;
pub mod ledger;
pub mod index;
pub mod batch;
pub mod cache;
pub mod store;
pub mod iterator;

mod fetch;
mod query;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LedgerError, Result};
pub use config::Config;
pub use iterator::LedgerIterator;
pub use key::VersionedKey;
pub use ledger::{ContentId, DirLedger, Ledger, MemoryLedger};
pub use store::LedgerStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LedgerKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
