//! Content identifiers
//!
//! Fixed-width text addresses of blobs on the ledger.

use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, Result};

/// Width (T) of a content identifier: base64 of a 32-byte digest
pub const CONTENT_ID_LEN: usize = 44;

/// Opaque, immutable address of a blob (standard base64, `=` padded)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; CONTENT_ID_LEN]);

impl ContentId {
    /// Validate raw identifier bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let id: [u8; CONTENT_ID_LEN] = bytes.try_into().map_err(|_| {
            LedgerError::InvalidKey(format!(
                "content id must be {} bytes, got {}",
                CONTENT_ID_LEN,
                bytes.len()
            ))
        })?;

        // 32 bytes encode to 43 significant chars plus one '='
        let (body, pad) = id.split_at(CONTENT_ID_LEN - 1);
        if pad != b"=" || !body.iter().all(|&b| is_base64_char(b)) {
            return Err(LedgerError::InvalidKey(format!(
                "content id is not padded base64: {:?}",
                String::from_utf8_lossy(&id)
            )));
        }

        Ok(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Validated as ASCII on construction
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// URL/filename-safe rendering ('+' → '-', '/' → '_')
    pub fn to_file_name(&self) -> String {
        self.as_str()
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                c => c,
            })
            .collect()
    }
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}

impl FromStr for ContentId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for ContentId {
    type Error = LedgerError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.as_str())
    }
}
