//! Hint Clock
//!
//! Monotonic time source plus a scheduling primitive for the hint gate's
//! timed transitions. Time keeps running while the game simulation is paused.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::hint::HintTimer;

/// Handle to a scheduled continuation, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Time source and scheduler consumed by the hint gate
pub trait Clock {
    /// Current monotonic time
    fn now(&self) -> Instant;

    /// Deliver `timer` once `delay` has elapsed
    fn after(&self, delay: Duration, timer: HintTimer) -> TimerHandle;

    /// Cancel a pending continuation. Unknown or already fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

// ============================================================================
// Real-time clock
// ============================================================================

/// Clock backed by the tokio timer
///
/// Each continuation is a task that sleeps until its deadline and then sends
/// the timer to the event loop through the channel returned by [`TokioClock::new`].
pub struct TokioClock {
    tx: mpsc::UnboundedSender<HintTimer>,
    timers: DashMap<u64, AbortHandle>,
    next_id: AtomicU64,
}

impl TokioClock {
    /// Create a clock and the receiver its continuations are delivered on.
    /// Must be used from within a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HintTimer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let clock = Self {
            tx,
            timers: DashMap::new(),
            next_id: AtomicU64::new(1),
        };
        (clock, rx)
    }

    /// Number of continuations that have not fired or been cancelled
    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|t| !t.value().is_finished()).count()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn after(&self, delay: Duration, timer: HintTimer) -> TimerHandle {
        self.timers.retain(|_, task| !task.is_finished());

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let deadline = Instant::now() + delay;
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if tx.send(timer).is_err() {
                debug!("Timer {} fired after the event loop stopped", id);
            }
        });

        self.timers.insert(id, task.abort_handle());
        trace!("Scheduled timer {} ({:?}) in {:?}", id, timer.phase, delay);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some((_, task)) = self.timers.remove(&handle.0) {
            task.abort();
            trace!("Cancelled timer {}", handle.0);
        }
    }
}

// ============================================================================
// Manual clock
// ============================================================================

#[derive(Debug, Default)]
struct ManualState {
    elapsed: Duration,
    next_id: u64,
    /// (deadline, id) -> timer; ordered so ties fire in scheduling order
    pending: BTreeMap<(Duration, u64), HintTimer>,
}

/// Deterministic clock that only moves when told to
///
/// Time is measured from the moment the clock was created. Continuations are
/// handed back by [`ManualClock::pop_due`] so the caller can deliver them.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    state: Mutex<ManualState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            state: Mutex::new(ManualState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        // The state holds no invariants a panicking holder could break.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Remove the earliest continuation due at or before `until`, moving the
    /// clock to its deadline
    pub fn pop_due(&self, until: Duration) -> Option<HintTimer> {
        let mut state = self.lock();
        let key = *state.pending.keys().next()?;
        if key.0 > until {
            return None;
        }
        let timer = state.pending.remove(&key)?;
        state.elapsed = state.elapsed.max(key.0);
        Some(timer)
    }

    /// Move the clock forward without firing anything
    pub fn set_elapsed(&self, elapsed: Duration) {
        let mut state = self.lock();
        state.elapsed = state.elapsed.max(elapsed);
    }

    /// Advance by `by`, passing every continuation that comes due to `fire`
    /// in deadline order. Continuations scheduled by `fire` are honoured if
    /// they fall inside the window.
    pub fn advance(&self, by: Duration, mut fire: impl FnMut(HintTimer)) {
        let target = self.elapsed() + by;
        while let Some(timer) = self.pop_due(target) {
            fire(timer);
        }
        self.set_elapsed(target);
    }

    /// Number of continuations waiting to fire
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn after(&self, delay: Duration, timer: HintTimer) -> TimerHandle {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.elapsed + delay;
        state.pending.insert((deadline, id), timer);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.lock().pending.retain(|(_, id), _| *id != handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::HintPhase;

    fn timer(generation: u64, phase: HintPhase) -> HintTimer {
        HintTimer { generation, phase }
    }

    #[test]
    fn test_manual_clock_fires_in_deadline_order() {
        let clock = ManualClock::new();
        clock.after(Duration::from_secs(10), timer(2, HintPhase::Unlock));
        clock.after(Duration::from_secs(5), timer(1, HintPhase::Hide));

        let mut fired = Vec::new();
        clock.advance(Duration::from_secs(7), |t| fired.push(t));
        assert_eq!(fired, vec![timer(1, HintPhase::Hide)]);
        assert_eq!(clock.elapsed(), Duration::from_secs(7));

        clock.advance(Duration::from_secs(3), |t| fired.push(t));
        assert_eq!(fired.len(), 2);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_manual_clock_cancel() {
        let clock = ManualClock::new();
        let handle = clock.after(Duration::from_secs(1), timer(1, HintPhase::Hide));
        clock.cancel(handle);
        // Unknown handles are ignored
        clock.cancel(handle);

        let mut fired = 0;
        clock.advance(Duration::from_secs(2), |_| fired += 1);
        assert_eq!(fired, 0);
    }

    #[test]
    fn test_manual_clock_now_tracks_deadline_while_firing() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.after(Duration::from_secs(60), timer(1, HintPhase::Hide));

        let mut seen = None;
        let target = Duration::from_secs(100);
        while clock.pop_due(target).is_some() {
            seen = Some(clock.now() - start);
        }
        assert_eq!(seen, Some(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_delivers_after_delay() {
        let (clock, mut rx) = TokioClock::new();
        let start = clock.now();
        clock.after(Duration::from_secs(60), timer(1, HintPhase::Hide));

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, timer(1, HintPhase::Hide));
        assert!(clock.now() - start >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_cancel() {
        let (clock, mut rx) = TokioClock::new();
        let cancelled = clock.after(Duration::from_secs(1), timer(1, HintPhase::Hide));
        clock.after(Duration::from_secs(2), timer(2, HintPhase::Hide));
        clock.cancel(cancelled);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.generation, 2);
        assert_eq!(clock.pending(), 0);
    }
}
