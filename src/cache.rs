//! Content cache
//!
//! Everything fetched from the ledger is immutable, so entries never need
//! invalidation; they only leave on capacity eviction.
//!
//! Eviction is FIFO with a second chance: an entry read since it was last
//! considered is moved to the back of the queue once instead of dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::ledger::ContentId;

struct Slot<V> {
    value: V,
    referenced: bool,
}

struct Inner<V> {
    slots: HashMap<ContentId, Slot<V>>,
    /// Insertion order, front is the next eviction candidate
    queue: VecDeque<ContentId>,
}

/// Thread-safe, capacity-bounded cache keyed by content id
pub struct ContentCache<V: Clone> {
    capacity: usize,
    inner: Mutex<Inner<V>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<V: Clone> ContentCache<V> {
    /// A capacity of 0 disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                slots: HashMap::new(),
                queue: VecDeque::new(),
            }),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, id: &ContentId) -> Option<V> {
        let mut inner = self.inner.lock();
        match inner.slots.get_mut(id) {
            Some(slot) => {
                slot.referenced = true;
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(slot.value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, id: ContentId, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.slots.contains_key(&id) {
            return;
        }

        while inner.slots.len() >= self.capacity {
            let Some(victim) = inner.queue.pop_front() else {
                break;
            };
            match inner.slots.get_mut(&victim) {
                Some(slot) if slot.referenced => {
                    slot.referenced = false;
                    inner.queue.push_back(victim);
                }
                _ => {
                    inner.slots.remove(&victim);
                }
            }
        }

        inner.slots.insert(
            id,
            Slot {
                value,
                referenced: false,
            },
        );
        inner.queue.push_back(id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.slots.clear();
        inner.queue.clear();
    }

    /// (hits, misses)
    pub fn stats(&self) -> (usize, usize) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
