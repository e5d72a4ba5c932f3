use crate::PhysicalSlot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FastScrollState {
    #[default]
    Idle,
    /// A programmatic jump toward `target` is in progress.
    Scrolling { target: PhysicalSlot },
}

/// End-of-motion events reported by a scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleSignal {
    DragEnded { will_decelerate: bool },
    DecelerationEnded,
    ScrollAnimationEnded,
}

impl SettleSignal {
    /// Whether the container has come to rest. A drag that hands off to deceleration has not.
    pub fn is_settle(self) -> bool {
        !matches!(
            self,
            Self::DragEnded {
                will_decelerate: true
            }
        )
    }
}

/// Suppresses content materialization while a programmatic jump is in flight.
///
/// Without gating, a jump across `D` slots makes the container's intermediate layout passes ask
/// for content `O(D)` times. While the gate is [`FastScrollState::Scrolling`], callers must not
/// invoke the renderer at all; when the gate settles they run exactly one materialization pass
/// over the slots visible at that point, which bounds the work by the visible slot count.
///
/// Only programmatic (non-drag) scroll requests should enter the gate. A new request while
/// scrolling overwrites the target; requests are never queued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FastScrollGate {
    state: FastScrollState,
}

impl FastScrollGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FastScrollState {
        self.state
    }

    pub fn is_scrolling(&self) -> bool {
        matches!(self.state, FastScrollState::Scrolling { .. })
    }

    pub fn target(&self) -> Option<PhysicalSlot> {
        match self.state {
            FastScrollState::Idle => None,
            FastScrollState::Scrolling { target } => Some(target),
        }
    }

    pub fn allows_materialization(&self) -> bool {
        !self.is_scrolling()
    }

    /// Enters (or retargets) the scrolling state.
    ///
    /// Returns `true` when the gate was idle before this call.
    pub fn request_jump(&mut self, target: PhysicalSlot) -> bool {
        let was_idle = !self.is_scrolling();
        vdebug!(target, was_idle, "FastScrollGate::request_jump");
        self.state = FastScrollState::Scrolling { target };
        was_idle
    }

    /// Returns to idle.
    ///
    /// Yields the jump target when a jump was in progress, in which case the caller owes one full
    /// materialization pass over the currently visible slots. Settling an idle gate is a no-op.
    pub fn settle(&mut self) -> Option<PhysicalSlot> {
        let target = self.target()?;
        vdebug!(target, "FastScrollGate::settle");
        self.state = FastScrollState::Idle;
        Some(target)
    }

    /// Convenience for [`Self::settle`] driven by a container signal.
    pub fn on_signal(&mut self, signal: SettleSignal) -> Option<PhysicalSlot> {
        if !signal.is_settle() {
            return None;
        }
        self.settle()
    }
}
