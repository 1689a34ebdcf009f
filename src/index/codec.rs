//! Index codec
//!
//! Fixed-stride split of an index buffer. Sort order is not validated:
//! the index producer is trusted.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{LedgerError, Result};
use crate::ledger::{ContentId, CONTENT_ID_LEN};

use super::{Index, IndexEntry};

/// Truncate `key` to `prefix_len` bytes, zero-padding on the right if shorter
pub fn pad_prefix(key: &[u8], prefix_len: usize) -> Vec<u8> {
    let mut prefix = vec![0u8; prefix_len];
    let n = key.len().min(prefix_len);
    prefix[..n].copy_from_slice(&key[..n]);
    prefix
}

/// Decode an index buffer into its entries
///
/// Key prefixes are zero-copy slices of `buf`.
pub fn decode_index(buf: &Bytes, prefix_len: usize) -> Result<Index> {
    let stride = prefix_len + CONTENT_ID_LEN;
    if buf.len() % stride != 0 {
        return Err(LedgerError::CorruptIndex(format!(
            "index length {} is not a multiple of entry width {}",
            buf.len(),
            stride
        )));
    }

    let mut entries = Vec::with_capacity(buf.len() / stride);
    for start in (0..buf.len()).step_by(stride) {
        let id_start = start + prefix_len;
        let batch_id = ContentId::from_bytes(&buf[id_start..start + stride]).map_err(|e| {
            LedgerError::CorruptIndex(format!("entry {}: {}", start / stride, e))
        })?;

        entries.push(IndexEntry {
            key_prefix: buf.slice(start..id_start),
            batch_id,
        });
    }

    Ok(Index::new(prefix_len, entries))
}

/// Encode entries back into the wire layout
///
/// Prefixes are re-padded to `prefix_len`, so entries built for a
/// different width are normalised rather than rejected.
pub fn encode_index(entries: &[IndexEntry], prefix_len: usize) -> Bytes {
    let mut buf = BytesMut::with_capacity(entries.len() * (prefix_len + CONTENT_ID_LEN));
    for entry in entries {
        buf.put_slice(&pad_prefix(&entry.key_prefix, prefix_len));
        buf.put_slice(entry.batch_id.as_bytes());
    }
    buf.freeze()
}
