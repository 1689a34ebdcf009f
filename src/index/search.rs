//! Index search
//!
//! Pure functions over a decoded [`Index`]. All comparisons are plain
//! lexicographic byte comparisons: the target keeps its full, untruncated
//! length while entries keep their full zero-padded width P.

use super::codec::pad_prefix;
use super::{Index, IndexEntry};

/// Position of the first entry whose prefix is `>= target` (ceiling)
fn ceiling(target: &[u8], entries: &[IndexEntry]) -> usize {
    entries.partition_point(|e| e.key_prefix.as_ref() < target)
}

/// Ceiling search for a point key
///
/// Returns the first entry with `prefix >= target` together with every
/// immediately following entry sharing that prefix (the tie group), or an
/// empty slice when every prefix is below `target`.
pub fn find_candidates<'a>(target: &[u8], index: &'a Index) -> &'a [IndexEntry] {
    let entries = index.entries();
    let start = ceiling(target, entries);
    let Some(first) = entries.get(start) else {
        return &[];
    };

    let ties = entries[start..]
        .iter()
        .take_while(|e| e.key_prefix == first.key_prefix)
        .count();

    &entries[start..start + ties]
}

/// Range search for the interval starting at `start` and bounded by `end`
///
/// Begins at the ceiling entry of `start` and includes every following entry
/// whose prefix is `<= end`, stopping at the first one above it. `end` is
/// compared at width P, so an entry whose prefix equals the truncated `end`
/// is kept: it may still hold keys strictly below `end`.
pub fn find_candidates_for_range<'a>(
    start: &[u8],
    end: &[u8],
    index: &'a Index,
) -> &'a [IndexEntry] {
    let entries = index.entries();
    let first = ceiling(start, entries);
    if first == entries.len() {
        return &[];
    }

    let end_prefix = pad_prefix(end, index.prefix_len());
    let run = entries[first..]
        .iter()
        .take_while(|e| e.key_prefix.as_ref() <= end_prefix.as_slice())
        .count();

    &entries[first..first + run]
}

/// Range search with no upper bound: the ceiling entry of `start` onwards
pub fn find_candidates_from<'a>(start: &[u8], index: &'a Index) -> &'a [IndexEntry] {
    let entries = index.entries();
    &entries[ceiling(start, entries)..]
}
