//! Batch fetch fan-out
//!
//! Candidate batches are independent, so cache misses are fetched by a
//! small set of worker threads and reassembled in index order.
//!
//! ```text
//!   candidates ──► jobs channel ──► worker 1..N ──► results channel ──► collector
//!                                    (Ledger::fetch + decode)           (index order)
//! ```
//!
//! The first error, or the fetch deadline, fails the whole call. Workers
//! check a shared cancellation flag before each fetch, so jobs that have
//! not started yet are skipped. Index fetches run under the same deadline.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use bytes::Bytes;
use crossbeam::channel::{self, RecvTimeoutError};

use crate::batch::Batch;
use crate::error::{LedgerError, Result};
use crate::index::IndexEntry;
use crate::ledger::{ContentId, Ledger};
use crate::store::LedgerStore;

type FetchResult = (usize, Result<Arc<Batch>>);

/// Fetch and decode one batch, treating "not found" as missing content
pub(crate) fn fetch_batch<L: Ledger + ?Sized>(ledger: &L, id: &ContentId) -> Result<Arc<Batch>> {
    let payload = ledger
        .fetch(id)?
        .ok_or(LedgerError::MissingContent(*id))?;
    Ok(Arc::new(Batch::decode(id, &payload)?))
}

impl<L: Ledger + 'static> LedgerStore<L> {
    /// Fetch the batch of every candidate, returned in candidate order
    pub(crate) fn fetch_batches(&self, candidates: &[IndexEntry]) -> Result<Vec<Arc<Batch>>> {
        let mut resolved: HashMap<ContentId, Arc<Batch>> = HashMap::new();
        let mut missing: Vec<ContentId> = Vec::new();
        let mut seen: HashSet<ContentId> = HashSet::with_capacity(candidates.len());

        for entry in candidates {
            let id = entry.batch_id;
            if !seen.insert(id) {
                continue;
            }
            match self.batch_cache().get(&id) {
                Some(batch) => {
                    resolved.insert(id, batch);
                }
                None => missing.push(id),
            }
        }

        tracing::trace!(
            candidates = candidates.len(),
            cached = resolved.len(),
            fetching = missing.len(),
            "fetching candidate batches"
        );

        let fetched = if missing.len() == 1 && self.config().fetch_timeout().is_none() {
            vec![fetch_batch(self.ledger().as_ref(), &missing[0])?]
        } else if missing.is_empty() {
            Vec::new()
        } else {
            self.fan_out(&missing)?
        };

        for (id, batch) in missing.into_iter().zip(fetched) {
            self.batch_cache().insert(id, Arc::clone(&batch));
            resolved.insert(id, batch);
        }

        candidates
            .iter()
            .map(|entry| {
                resolved
                    .get(&entry.batch_id)
                    .cloned()
                    .ok_or(LedgerError::MissingContent(entry.batch_id))
            })
            .collect()
    }

    /// Fetch one blob, bounded by the fetch deadline when one is configured
    pub(crate) fn fetch_with_deadline(&self, id: &ContentId) -> Result<Option<Bytes>> {
        let timeout = match self.config().fetch_timeout() {
            Some(timeout) => timeout,
            None => return self.ledger().fetch(id),
        };

        let (tx, rx) = channel::bounded(1);
        let ledger = Arc::clone(self.ledger());
        let job = *id;
        thread::Builder::new()
            .name("ledgerkv-fetch-index".to_string())
            .spawn(move || {
                let _ = tx.send(ledger.fetch(&job));
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(content = %id, "fetch deadline elapsed");
                Err(LedgerError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(LedgerError::Transport(format!(
                "fetch worker exited before delivering {}",
                id
            ))),
        }
    }

    /// Fetch `ids` on worker threads; results are aligned with `ids`
    fn fan_out(&self, ids: &[ContentId]) -> Result<Vec<Arc<Batch>>> {
        let (job_tx, job_rx) = channel::unbounded::<(usize, ContentId)>();
        let (result_tx, result_rx) = channel::unbounded::<FetchResult>();
        let cancelled = Arc::new(AtomicBool::new(false));

        for job in ids.iter().copied().enumerate() {
            // Receiver is alive in this scope
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let workers = self.config().fetch_workers.min(ids.len());
        for n in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let ledger = Arc::clone(self.ledger());
            let cancelled = Arc::clone(&cancelled);

            thread::Builder::new()
                .name(format!("ledgerkv-fetch-{}", n))
                .spawn(move || {
                    while let Ok((pos, id)) = jobs.recv() {
                        if cancelled.load(Ordering::Relaxed) {
                            break;
                        }
                        if results.send((pos, fetch_batch(ledger.as_ref(), &id))).is_err() {
                            break;
                        }
                    }
                })?;
        }
        drop(result_tx);

        let timeout = self.config().fetch_timeout();
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut slots: Vec<Option<Arc<Batch>>> = vec![None; ids.len()];

        for _ in 0..ids.len() {
            let received = match deadline {
                Some(deadline) => result_rx.recv_deadline(deadline),
                None => result_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            let (pos, result) = match received {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => {
                    cancelled.store(true, Ordering::Relaxed);
                    tracing::warn!(pending = ids.len(), "batch fetch deadline elapsed");
                    return Err(LedgerError::Timeout(timeout.unwrap_or_default()));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(LedgerError::Transport(
                        "fetch workers exited before delivering every batch".to_string(),
                    ));
                }
            };

            match result {
                Ok(batch) => slots[pos] = Some(batch),
                Err(e) => {
                    cancelled.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }

        slots
            .into_iter()
            .zip(ids)
            .map(|(slot, id)| slot.ok_or(LedgerError::MissingContent(*id)))
            .collect()
    }
}
