use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Flags guarded by [`SessionControl`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    pub paused: bool,
    pub cancelled: bool,
    pub finished: bool,
}

/// Cancellation token and pause gate for one playback session.
///
/// Cancellation is monotonic: once set it is never cleared, and a new
/// session needs a new `SessionControl`. Every wait on the gate wakes on
/// cancellation.
///
/// # Example
/// ```
/// use gc_player::control::SessionControl;
///
/// let control = SessionControl::new();
/// control.pause();
/// assert!(control.is_paused());
/// control.cancel();
/// control.resume();
/// assert!(control.is_cancelled());
/// // Cancelled sessions never block.
/// assert!(!control.wait_if_paused());
/// ```
#[derive(Debug, Default)]
pub struct SessionControl {
    state: Mutex<ControlState>,
    changed: Condvar,
}

impl SessionControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the flags, recovering from a poisoned mutex.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the flags.
    #[must_use]
    pub fn snapshot(&self) -> ControlState {
        *self.lock()
    }

    /// Close the pause gate. Ignored once cancelled or finished.
    pub fn pause(&self) {
        let mut state = self.lock();
        if !state.cancelled && !state.finished {
            state.paused = true;
        }
    }

    /// Open the pause gate.
    pub fn resume(&self) {
        self.lock().paused = false;
        self.changed.notify_all();
    }

    /// Signal cancellation and wake every waiter.
    ///
    /// Once this returns, a pump holding this control can no longer publish.
    pub fn cancel(&self) {
        self.lock().cancelled = true;
        self.changed.notify_all();
    }

    /// Mark the session as ended by the pump itself (end of stream).
    pub(crate) fn finish(&self) {
        let mut state = self.lock();
        state.finished = true;
        state.paused = false;
        drop(state);
        self.changed.notify_all();
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Block while paused. Returns `true` if the caller may proceed, `false`
    /// if the session was cancelled.
    pub fn wait_if_paused(&self) -> bool {
        let guard = self.lock();
        let guard = self
            .changed
            .wait_while(guard, |s| s.paused && !s.cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        !guard.cancelled
    }

    /// Sleep for `duration` unless cancelled first. Returns `true` if the full
    /// duration elapsed.
    pub fn sleep_unless_cancelled(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = self.lock();
        while !guard.cancelled {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            guard = self
                .changed
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        false
    }
}
