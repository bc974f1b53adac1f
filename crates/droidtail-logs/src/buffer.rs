use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use droidtail_types::LogEntry;

/// How many entries the circular store retains. Kept low so a full repaint
/// of the window stays cheap.
pub const DEFAULT_CAPACITY: usize = 300;

/// Cadence at which staged entries are merged into the store
pub const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// Fixed-capacity circular store addressed by (oldest, count).
/// Mutated only by the drain step; slots are reused, never freed.
struct Ring {
    slots: Vec<Option<LogEntry>>,
    oldest: usize,
    next: usize,
    count: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            oldest: 0,
            next: 0,
            count: 0,
        }
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.oldest = 0;
        self.next = 0;
        self.count = 0;
    }
}

/// Thread-safe bounded buffer for log entries.
///
/// Producers append to a staging queue from any task; a single consumer
/// merges staged entries into the circular store on a fixed cadence via
/// [`LogBuffer::should_advance`]. Once the store is full, each insertion
/// overwrites the oldest entry. Bursts larger than the capacity between two
/// drains lose their oldest lines; that is deliberate policy, not an error.
///
/// Lock order is staging before store. `ingest` takes only the staging
/// lock and `snapshot` only the store lock, so producers never contend
/// with readers.
#[derive(Clone)]
pub struct LogBuffer {
    /// Newly arrived entries, not yet visible to readers
    staging: Arc<Mutex<VecDeque<LogEntry>>>,

    /// The bounded store readers see
    store: Arc<Mutex<Ring>>,

    /// Earliest instant at which the next drain may run
    next_drain: Arc<Mutex<Instant>>,

    capacity: usize,
}

impl LogBuffer {
    /// Create a buffer retaining at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");
        Self {
            staging: Arc::new(Mutex::new(VecDeque::new())),
            store: Arc::new(Mutex::new(Ring::new(capacity))),
            next_drain: Arc::new(Mutex::new(Instant::now())),
            capacity,
        }
    }

    /// Parse a raw logcat line and stage it. Lines too short to carry a
    /// payload are dropped silently. Safe to call concurrently from any
    /// number of producer tasks; never blocks beyond the staging lock.
    pub fn ingest(&self, raw: &str) {
        if let Some(entry) = LogEntry::parse(raw) {
            self.staging.lock().push_back(entry);
        }
    }

    /// Rate-limited drain. Returns false inside the cadence window;
    /// otherwise arms the next deadline, merges staged entries into the
    /// store, and reports whether anything new became visible. The caller
    /// uses the result as its repaint signal.
    pub fn should_advance(&self, now: Instant) -> bool {
        {
            let mut next = self.next_drain.lock();
            if now < *next {
                return false;
            }
            *next = now + DRAIN_INTERVAL;
        }
        self.drain()
    }

    /// Merge all staged entries into the circular store
    fn drain(&self) -> bool {
        let mut staging = self.staging.lock();
        if staging.is_empty() {
            return false;
        }

        let mut store = self.store.lock();

        // Anything staged beyond capacity could never be observed; discard
        // the oldest surplus before touching the store.
        let surplus = staging.len().saturating_sub(self.capacity);
        for _ in 0..surplus {
            staging.pop_front();
        }
        if surplus > 0 {
            tracing::trace!(dropped = surplus, "staged burst exceeded capacity");
        }

        // Evict just enough stored entries to make room
        let incoming = staging.len();
        let evict = (store.count + incoming).saturating_sub(self.capacity);
        store.oldest = (store.oldest + evict) % self.capacity;
        store.count -= evict;

        for entry in staging.drain(..) {
            let slot = store.next;
            store.slots[slot] = Some(entry);
            store.next = (store.next + 1) % self.capacity;
            store.count += 1;
        }

        true
    }

    /// Copy of the store contents in arrival order, oldest to newest.
    /// Safe to iterate while ingestion continues.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        let store = self.store.lock();
        let mut out = Vec::with_capacity(store.count);
        let mut index = store.oldest;
        for _ in 0..store.count {
            if let Some(entry) = &store.slots[index] {
                out.push(entry.clone());
            }
            index = (index + 1) % self.capacity;
        }
        out
    }

    /// Drop all staged and stored entries
    pub fn reset(&self) {
        self.staging.lock().clear();
        self.store.lock().clear();
    }

    /// Number of entries currently visible to readers
    pub fn len(&self) -> usize {
        self.store.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries staged but not yet drained
    pub fn staged_len(&self) -> usize {
        self.staging.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
