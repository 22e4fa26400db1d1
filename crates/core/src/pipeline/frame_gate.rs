use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::shared::frame::Frame;

/// Single-slot in-flight marker: holds at most one outstanding detection.
///
/// `try_acquire` is advisory and non-blocking; while the slot is held,
/// callers drop their frame instead of waiting. The returned guard
/// releases the slot when dropped, and that release is the only mechanism
/// that re-opens the gate. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct DetectionSlot {
    inner: Arc<SlotInner>,
}

#[derive(Debug, Default)]
struct SlotInner {
    held: AtomicBool,
    acquired_at: Mutex<Option<Instant>>,
}

impl DetectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<SlotGuard> {
        if self
            .inner
            .held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }
        *lock_acquired_at(&self.inner) = Some(Instant::now());
        Some(SlotGuard {
            slot: Arc::clone(&self.inner),
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.held.load(Ordering::Acquire)
    }

    /// Age of the current in-flight detection, if any.
    ///
    /// No timeout is enforced anywhere; a hung detector shows up here as
    /// an ever-growing age, for an external watchdog to act on.
    pub fn in_flight_age(&self) -> Option<Duration> {
        lock_acquired_at(&self.inner).map(|t| t.elapsed())
    }
}

fn lock_acquired_at(inner: &SlotInner) -> std::sync::MutexGuard<'_, Option<Instant>> {
    // Critical sections only copy an Option<Instant>; a poisoned lock
    // cannot hold inconsistent state.
    inner
        .acquired_at
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Releases the detection slot on drop, unconditionally: success, failure,
/// and delivery errors all travel through a drop of this guard.
#[derive(Debug)]
pub struct SlotGuard {
    slot: Arc<SlotInner>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        *lock_acquired_at(&self.slot) = None;
        self.slot.held.store(false, Ordering::Release);
    }
}

/// Live gate counters, readable from any thread. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct GateStats {
    inner: Arc<StatsInner>,
}

#[derive(Debug, Default)]
struct StatsInner {
    submitted: AtomicU64,
    admitted: AtomicU64,
    dropped: AtomicU64,
}

impl GateStats {
    pub fn submitted(&self) -> u64 {
        self.inner.submitted.load(Ordering::Relaxed)
    }

    pub fn admitted(&self) -> u64 {
        self.inner.admitted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    fn record_admit(&self) {
        self.inner.submitted.fetch_add(1, Ordering::Relaxed);
        self.inner.admitted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_drop(&self) {
        self.inner.submitted.fetch_add(1, Ordering::Relaxed);
        self.inner.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

/// A frame that made it through the gate, tagged with its detection
/// sequence number and carrying the guard that re-opens the gate when the
/// detection cycle finishes.
#[derive(Debug)]
pub struct AdmittedFrame {
    pub frame: Frame,
    pub seq: u64,
    pub guard: SlotGuard,
}

/// Backpressure gate between capture and detection.
///
/// `submit` is called once per captured frame on the capture context. A
/// frame is dispatched only when no detection is in flight and the worker
/// channel has room; everything else is dropped on the floor so the
/// pipeline never falls behind live video.
pub struct FrameGate {
    slot: DetectionSlot,
    tx: Sender<AdmittedFrame>,
    next_seq: u64,
    stats: GateStats,
}

impl FrameGate {
    pub fn new(tx: Sender<AdmittedFrame>) -> Self {
        Self {
            slot: DetectionSlot::new(),
            tx,
            next_seq: 0,
            stats: GateStats::default(),
        }
    }

    /// Admit or drop one captured frame. Never blocks; returns whether the
    /// frame was dispatched.
    pub fn submit(&mut self, frame: Frame) -> bool {
        let Some(guard) = self.slot.try_acquire() else {
            self.stats.record_drop();
            return false;
        };

        let admitted = AdmittedFrame {
            frame,
            seq: self.next_seq,
            guard,
        };
        match self.tx.try_send(admitted) {
            Ok(()) => {
                self.next_seq += 1;
                self.stats.record_admit();
                true
            }
            Err(err) => {
                // A full or disconnected worker counts as a drop. The
                // rejected message still owns the guard, so dropping it
                // here re-opens the slot.
                drop(err.into_inner());
                self.stats.record_drop();
                false
            }
        }
    }

    /// Shared handle onto the gate's slot.
    pub fn slot(&self) -> DetectionSlot {
        self.slot.clone()
    }

    /// Shared handle onto the gate's counters.
    pub fn stats(&self) -> GateStats {
        self.stats.clone()
    }
}
