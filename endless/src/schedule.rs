//! Cooperative trailing-edge scheduling against a host-provided millisecond clock.
//!
//! Neither type owns a timer. The host calls `push` when a signal arrives and `poll` from its
//! frame/timer tick; `next_deadline` tells it when the next tick matters.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending<T> {
    deadline_ms: u64,
    value: T,
}

/// Emits at most once per `interval_ms`, always with the latest value of a burst.
///
/// The first signal after a quiet period is emitted immediately. Signals arriving before the
/// interval has elapsed replace the pending value, which fires at `last_emit + interval`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle<T> {
    interval_ms: u64,
    last_emit_ms: Option<u64>,
    pending: Option<Pending<T>>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit_ms: None,
            pending: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_emit_ms(&self) -> Option<u64> {
        self.last_emit_ms
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    pub fn push(&mut self, now_ms: u64, value: T) -> Option<T> {
        match self.last_emit_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.pending = Some(Pending {
                    deadline_ms: last.saturating_add(self.interval_ms),
                    value,
                });
                None
            }
            _ => {
                self.pending = None;
                self.last_emit_ms = Some(now_ms);
                Some(value)
            }
        }
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let deadline = self.pending.as_ref()?.deadline_ms;
        if now_ms < deadline {
            return None;
        }
        let pending = self.pending.take()?;
        self.last_emit_ms = Some(now_ms);
        Some(pending.value)
    }

    /// Drops any pending emission. The spacing guarantee relative to the last emission is kept.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Emits the latest value once the signal stream has been idle for `delay_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debounce<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    /// Records a signal, superseding whatever was pending.
    pub fn push(&mut self, now_ms: u64, value: T) {
        self.pending = Some(Pending {
            deadline_ms: now_ms.saturating_add(self.delay_ms),
            value,
        });
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        if now_ms < self.pending.as_ref()?.deadline_ms {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
