use endless::{Align, PhysicalSlot, Rect, SettleSignal, Vector, Viewport};

/// The scrollable surface an engine drives.
///
/// Slots are addressed by [`PhysicalSlot`]. The engine tells the container how many slots exist
/// (`slot_count` on each engine) and how large each one is; the container lays them out along the
/// engine's axis, and reports back geometry and scroll signals.
pub trait ScrollContainer {
    /// What a slot displays once bound.
    type Content;

    /// The container's frame in its parent's coordinate space.
    fn frame(&self) -> Rect;

    fn offset(&self) -> Vector;

    fn set_offset(&mut self, offset: Vector);

    /// Total size of the laid-out content.
    fn content_extent(&self) -> Vector;

    /// Visits the currently visible slots in ascending slot order.
    ///
    /// Rects are in the same coordinate space as [`Self::frame`].
    fn for_each_visible_slot(&self, f: &mut dyn FnMut(Viewport));

    fn scroll_to(&mut self, slot: PhysicalSlot, align: Align, animated: bool);

    /// Inserts `count` slots before `at`. Existing slots at or after `at` shift up by `count`.
    fn insert_slots(&mut self, at: PhysicalSlot, count: usize);

    fn append_slots(&mut self, count: usize);

    /// Drops every bound content and asks for it again on the next layout pass.
    fn reload(&mut self);

    /// Runs any pending layout so geometry reads reflect the latest slot changes.
    fn layout_if_needed(&mut self);

    /// Couples scrolling to page boundaries. Engines switch it off around programmatic jumps.
    fn set_paging_coupling(&mut self, enabled: bool);

    fn bind(&mut self, slot: PhysicalSlot, content: Self::Content);
}

/// Signals a scroll container reports to its engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollSignal {
    DidScroll,
    DidEndDragging { will_decelerate: bool },
    DidEndDecelerating,
    DidEndScrollAnimation,
}

impl ScrollSignal {
    pub fn settle_signal(self) -> Option<SettleSignal> {
        match self {
            Self::DidScroll => None,
            Self::DidEndDragging { will_decelerate } => {
                Some(SettleSignal::DragEnded { will_decelerate })
            }
            Self::DidEndDecelerating => Some(SettleSignal::DecelerationEnded),
            Self::DidEndScrollAnimation => Some(SettleSignal::ScrollAnimationEnded),
        }
    }

    /// Whether the container has come to rest.
    pub fn is_settle(self) -> bool {
        self.settle_signal().is_some_and(SettleSignal::is_settle)
    }
}
