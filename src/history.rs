//! Bounded snapshot history for undo.
//!
//! History is a stack of [`GraphSnapshot`]s whose top is always the state
//! after the last committed edit. Pushes pass through a [`PushGate`]: after a
//! push the gate stays locked for a short window and further pushes inside
//! that window are dropped, so a burst of related edits collapses into one
//! entry.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::graph::GraphStore;
use crate::models::GraphSnapshot;

/// Maximum number of retained snapshots.
pub const HISTORY_CAPACITY: usize = 21;

/// Default lock window after a committed push.
pub const DEFAULT_PUSH_WINDOW: Duration = Duration::from_millis(100);

/// Source of the current time for the push gate.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().expect("clock lock poisoned");
        *elapsed += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock().expect("clock lock poisoned")
    }
}

/// Debounce state: `Idle -> Locked(until) -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushGate {
    Idle,
    Locked { until: Instant },
}

impl PushGate {
    /// Reopen the gate if its window has elapsed by `now`.
    fn poll(&mut self, now: Instant) {
        if let Self::Locked { until } = *self {
            if now >= until {
                *self = Self::Idle;
            }
        }
    }

    fn is_open(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

pub struct HistoryManager {
    entries: VecDeque<GraphSnapshot>,
    gate: PushGate,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl HistoryManager {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, DEFAULT_PUSH_WINDOW)
    }

    pub fn with_window(clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            gate: PushGate::Idle,
            window,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn gate(&self) -> PushGate {
        self.gate
    }

    /// The most recent snapshot.
    pub fn current(&self) -> Option<&GraphSnapshot> {
        self.entries.back()
    }

    /// Record `snapshot` unless the gate is locked. Returns whether it was kept.
    pub fn push(&mut self, snapshot: GraphSnapshot) -> bool {
        let now = self.clock.now();
        self.gate.poll(now);
        if !self.gate.is_open() {
            tracing::trace!("History push dropped inside lock window");
            return false;
        }
        self.commit(snapshot, now);
        true
    }

    /// Record `snapshot` regardless of the gate, then re-arm it.
    pub fn checkpoint(&mut self, snapshot: GraphSnapshot) {
        let now = self.clock.now();
        self.commit(snapshot, now);
    }

    /// Step back one entry and apply it to `graph`.
    ///
    /// With fewer than two entries there is no earlier state and nothing
    /// happens. The discarded entry cannot be recovered.
    pub fn undo(&mut self, graph: &mut GraphStore) -> bool {
        if self.entries.len() < 2 {
            return false;
        }
        self.entries.pop_back();
        match self.entries.back() {
            Some(previous) => {
                graph.restore(previous);
                tracing::debug!("Undo applied, {} history entries left", self.entries.len());
                true
            }
            None => false,
        }
    }

    /// Drop all entries and start over from `snapshot`.
    pub fn reset(&mut self, snapshot: GraphSnapshot) {
        self.entries.clear();
        self.entries.push_back(snapshot);
        self.gate = PushGate::Idle;
    }

    fn commit(&mut self, snapshot: GraphSnapshot, now: Instant) {
        self.entries.push_back(snapshot);
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.gate = PushGate::Locked {
            until: now + self.window,
        };
        tracing::debug!("History snapshot committed ({} entries)", self.entries.len());
    }
}
